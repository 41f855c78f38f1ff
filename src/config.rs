use crate::ip::AddressBlock;
use serde::{Deserialize, Serialize};

/// A network description document: parent networks in processing order.
pub type NetworkDocument = Vec<NetworkSpec>;

/// One parent network and the subnets to carve out of it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NetworkSpec {
    /// CIDR literal of the parent network, e.g. "10.0.0.0/24"
    pub network: String,
    /// Subnets in declaration order; the order breaks ties between equal sizes
    pub subnets: Vec<SubnetSpec>,
}

impl NetworkSpec {
    /// Validate the network entry and all of its subnets
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.network.trim().is_empty() {
            return Err(ValidationError::InvalidNetwork(
                "network cannot be empty".to_string(),
            ));
        }

        AddressBlock::parse(&self.network)
            .map_err(|e| ValidationError::InvalidNetwork(e.to_string()))?;

        for subnet in &self.subnets {
            subnet.validate(&self.network)?;
        }

        Ok(())
    }
}

/// Declarative subnet request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubnetSpec {
    pub name: String,
    /// Desired prefix length
    pub size: u32,
    /// How many subnets of this size to create; 0 skips the entry
    #[serde(default = "default_number")]
    pub number: u32,
    /// Subnets per row; only affects labels and address demand
    #[serde(rename = "per-row", default = "default_per_row")]
    pub per_row: u32,
}

impl SubnetSpec {
    pub fn new(name: &str, size: u32) -> Self {
        Self {
            name: name.to_string(),
            size,
            number: default_number(),
            per_row: default_per_row(),
        }
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = number;
        self
    }

    pub fn with_per_row(mut self, per_row: u32) -> Self {
        self.per_row = per_row;
        self
    }

    fn validate(&self, network: &str) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidSubnet(format!(
                "subnet name cannot be empty (network {})",
                network
            )));
        }
        if self.per_row == 0 {
            return Err(ValidationError::InvalidSubnet(format!(
                "per-row must be at least 1 for subnet '{}'",
                self.name
            )));
        }
        Ok(())
    }
}

fn default_number() -> u32 {
    1
}

fn default_per_row() -> u32 {
    1
}

/// Network description validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid network description: {0}")]
    InvalidNetwork(String),
    #[error("Invalid subnet description: {0}")]
    InvalidSubnet(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_parsing() {
        let json = r#"
[
  {
    "network": "10.0.0.0/24",
    "subnets": [
      {"name": "servers", "size": 26, "number": 2},
      {"name": "desks", "size": 28, "number": 3, "per-row": 4},
      {"name": "uplink", "size": 30}
    ]
  }
]
"#;

        let document: NetworkDocument = serde_json::from_str(json).unwrap();
        assert_eq!(document.len(), 1);
        assert!(document[0].validate().is_ok());

        let subnets = &document[0].subnets;
        assert_eq!(subnets[0], SubnetSpec::new("servers", 26).with_number(2));
        assert_eq!(subnets[1].per_row, 4);
        assert_eq!(subnets[2].number, 1);
        assert_eq!(subnets[2].per_row, 1);
    }

    #[test]
    fn test_missing_required_fields() {
        let no_size = r#"[{"network": "10.0.0.0/24", "subnets": [{"name": "a"}]}]"#;
        assert!(serde_json::from_str::<NetworkDocument>(no_size).is_err());

        let no_subnets = r#"[{"network": "10.0.0.0/24"}]"#;
        assert!(serde_json::from_str::<NetworkDocument>(no_subnets).is_err());

        let negative = r#"[{"network": "10.0.0.0/24", "subnets": [{"name": "a", "size": 26, "number": -1}]}]"#;
        assert!(serde_json::from_str::<NetworkDocument>(negative).is_err());
    }

    #[test]
    fn test_validation_errors() {
        let spec = NetworkSpec {
            network: "10.0.0.1/24".to_string(),
            subnets: vec![],
        };
        assert!(matches!(spec.validate(), Err(ValidationError::InvalidNetwork(_))));

        let spec = NetworkSpec {
            network: "  ".to_string(),
            subnets: vec![],
        };
        assert!(matches!(spec.validate(), Err(ValidationError::InvalidNetwork(_))));

        let spec = NetworkSpec {
            network: "10.0.0.0/24".to_string(),
            subnets: vec![SubnetSpec::new("rack", 28).with_per_row(0)],
        };
        assert!(matches!(spec.validate(), Err(ValidationError::InvalidSubnet(_))));

        let spec = NetworkSpec {
            network: "10.0.0.0/24".to_string(),
            subnets: vec![SubnetSpec::new("", 28)],
        };
        assert!(matches!(spec.validate(), Err(ValidationError::InvalidSubnet(_))));
    }

    #[test]
    fn test_yaml_document() {
        let yaml = r#"
- network: "2001:db8::/48"
  subnets:
    - name: lan
      size: 64
      number: 4
"#;
        let document: NetworkDocument = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(document[0].subnets[0].number, 4);
        assert!(document[0].validate().is_ok());
    }
}
