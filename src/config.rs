use crate::error::{Error, Result};

/// Settings one [`StackClient`](crate::StackClient) is bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub profile: Option<String>,
    pub region: Option<String>,
}

impl ClientConfig {
    pub fn new(profile: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            profile: Some(profile.into()),
            region: Some(region.into()),
        }
    }

    pub(crate) fn resolve(self) -> Result<ResolvedConfig> {
        match (non_empty(self.profile), non_empty(self.region)) {
            (Some(profile), Some(region)) => Ok(ResolvedConfig { profile, region }),
            _ => Err(Error::InvalidConfig),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedConfig {
    pub(crate) profile: String,
    pub(crate) region: String,
}
