//! The concrete operations the intent classifier can dispatch to.

mod by_name;
mod costs;
mod create_vm;
mod listing;

pub use by_name::{
    GetPrivateCloudsByOrganisation, GetServicesByOrganisation, GetVmsByProjectAndOrganisation,
};
pub use costs::GetTotalCosts;
pub use create_vm::CreateVm;
pub use listing::{GetOrganisations, GetProjects, GetServices, GetVms};

pub const GET_PROJECTS: &str = "get_projects";
pub const GET_SERVICES: &str = "get_services";
pub const GET_VMS: &str = "get_vms";
pub const GET_ORGANISATIONS: &str = "get_organisations";
pub const GET_TOTAL_COSTS: &str = "get_totalcosts";
pub const GET_SERVICES_BY_ORGANISATION: &str = "get_services_by_organisation";
pub const GET_PRIVATE_CLOUDS_BY_ORGANISATION: &str = "get_private_clouds_by_organisation";
pub const GET_VMS_BY_PROJECT_AND_ORGANISATION: &str = "get_vms_by_project_and_organisation";
pub const CREATE_VM: &str = "create_vm";

/// ", "-joined list, deduplicated preserving first-encountered order.
fn distinct_names<I: IntoIterator<Item = String>>(names: I) -> Vec<String> {
    let mut seen = Vec::new();
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

/// IP list as shown to the user: comma-joined, `-` when empty.
fn ip_list(ips: &[String]) -> String {
    if ips.is_empty() {
        "-".to_string()
    } else {
        ips.join(", ")
    }
}

/// `NAME: internal / external` line for one virtual machine.
fn instance_line(vm: &stratus_backend::Instance) -> String {
    format!(
        "{}: {} / {}",
        vm.name,
        ip_list(&vm.internal_ips),
        ip_list(&vm.external_ips)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_names_keeps_first_encounter_order() {
        let names = distinct_names(vec![
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
        ]);
        assert_eq!(names, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn ip_list_dashes_when_empty() {
        assert_eq!(ip_list(&[]), "-");
        assert_eq!(
            ip_list(&["10.0.0.1".to_string(), "10.0.0.2".to_string()]),
            "10.0.0.1, 10.0.0.2"
        );
    }
}
