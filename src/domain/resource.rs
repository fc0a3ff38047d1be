// CRM resource collections exposed by the collaborator API
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Customers,
    Deals,
    Interactions,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Deals, Resource::Customers, Resource::Interactions];

    /// Path segment under the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Customers => "customers",
            Resource::Deals => "deals",
            Resource::Interactions => "interactions",
        }
    }

    /// Singular noun used in error messages.
    pub fn singular(&self) -> &'static str {
        match self {
            Resource::Customers => "customer",
            Resource::Deals => "deal",
            Resource::Interactions => "interaction",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
