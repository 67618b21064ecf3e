//! Payload models for the slices of the cloud-management API the bot reads.
//! Unknown fields are ignored everywhere; the API returns far more than the
//! bot consumes.

use serde::{Deserialize, Deserializer, Serialize};

/// An organisation ("customer" in API terms) the caller belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Organisation {
    pub name: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub projects: Vec<ProjectRef>,
}

/// Project as embedded in a customer payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRef {
    pub name: String,
    #[serde(default)]
    pub uuid: String,
}

/// Project as returned by the `projects` endpoint, with its services.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    pub name: String,
}

/// A virtual machine instance.
#[derive(Debug, Clone, Deserialize)]
pub struct Instance {
    pub name: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub external_ips: Vec<String>,
    #[serde(default)]
    pub internal_ips: Vec<String>,
}

/// A private cloud tenant.
#[derive(Debug, Clone, Deserialize)]
pub struct Tenant {
    pub name: String,
    #[serde(default)]
    pub uuid: String,
}

/// An operating system image offered to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub name: String,
}

/// One monthly invoice. The API serializes `total` as a decimal string.
#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    pub month: u32,
    pub year: i32,
    #[serde(deserialize_with = "f64_from_string_or_number")]
    pub total: f64,
}

/// Parameters for creating a virtual machine, collected by the wizard.
#[derive(Debug, Clone, Serialize)]
pub struct CreateInstance {
    pub name: String,
    pub project: String,
    pub image: String,
}

fn f64_from_string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn organisation_decodes_with_projects() {
        let orgs: Vec<Organisation> = serde_json::from_str(
            r#"[{"name": "org1", "uuid": "id1", "projects": [{"name": "p1"}], "extra": 42}]"#,
        )
        .unwrap();
        assert_eq!(orgs[0].name, "org1");
        assert_eq!(orgs[0].projects[0].name, "p1");
    }

    #[test]
    fn invoice_total_decodes_from_string_and_number() {
        let invoices: Vec<Invoice> = serde_json::from_str(
            r#"[{"month": 1, "year": 2024, "total": "10.50"},
                {"month": 2, "year": 2024, "total": 3.25}]"#,
        )
        .unwrap();
        assert_eq!(invoices[0].total, 10.5);
        assert_eq!(invoices[1].total, 3.25);
    }

    #[test]
    fn instance_ip_lists_default_to_empty() {
        let vm: Instance = serde_json::from_str(r#"{"name": "vm1"}"#).unwrap();
        assert!(vm.external_ips.is_empty());
        assert!(vm.internal_ips.is_empty());
    }
}
