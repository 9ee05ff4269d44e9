pub mod ontraport_client;
