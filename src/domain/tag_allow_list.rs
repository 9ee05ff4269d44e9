/// The set of tag names this service is permitted to assign, parsed once
/// from a comma-separated configuration value. Membership is an exact
/// string match; names are trimmed at load time only.
#[derive(Clone, Debug)]
pub struct TagAllowList(Vec<String>);

impl TagAllowList {
    pub fn parse(raw: &str) -> Self {
        let mut tags: Vec<String> = Vec::new();
        for tag in raw.split(',') {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|known| known == tag) {
                tags.push(tag.to_string());
            }
        }

        Self(tags)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|known| known == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
