mod contact;
mod subscriber_email;
mod tag_allow_list;

pub use contact::Contact;
pub use subscriber_email::SubscriberEmail;
pub use tag_allow_list::TagAllowList;
