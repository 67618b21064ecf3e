//! Account-wide listings: projects, services, virtual machines,
//! organisations. Counts of 0, 1 and N each get their own phrasing; the
//! exact sentences are contract, exercised by the integration tests.

use async_trait::async_trait;

use crate::context::ExecContext;
use crate::error::Result;
use crate::operation::{Operation, Outcome};

use super::{distinct_names, instance_line, GET_ORGANISATIONS, GET_PROJECTS, GET_SERVICES, GET_VMS};

pub struct GetProjects;

#[async_trait]
impl Operation for GetProjects {
    fn name(&self) -> &'static str {
        GET_PROJECTS
    }

    async fn execute(&self, ctx: &ExecContext) -> Result<Outcome> {
        let organisations = ctx.client().customers(ctx.token()).await?;

        let total: usize = organisations.iter().map(|org| org.projects.len()).sum();
        let mut listing = String::new();
        for org in &organisations {
            if org.projects.is_empty() {
                continue;
            }
            listing.push_str(&format!("\nOrganisation '{}':", org.name));
            for project in &org.projects {
                listing.push_str(&format!("\n    {}", project.name));
            }
        }

        let statement = match total {
            0 => "You don't have any projects.".to_string(),
            1 => format!("You have 1 project in total.{listing}"),
            n => format!("You have {n} projects in total.{listing}"),
        };
        Ok(Outcome::text(statement))
    }
}

pub struct GetServices;

#[async_trait]
impl Operation for GetServices {
    fn name(&self) -> &'static str {
        GET_SERVICES
    }

    async fn execute(&self, ctx: &ExecContext) -> Result<Outcome> {
        let projects = ctx.client().projects(ctx.token(), None).await?;

        let names = distinct_names(
            projects
                .iter()
                .flat_map(|project| project.services.iter().map(|s| s.name.clone())),
        );

        let statement = match names.len() {
            0 => "Your organisation isn't using any services.".to_string(),
            1 => format!(
                "Your organisation is using 1 service. This service is {}",
                names[0]
            ),
            n => format!(
                "Your organisation is using {n} services. They are {}",
                names.join(", ")
            ),
        };
        Ok(Outcome::text(statement))
    }
}

pub struct GetVms;

#[async_trait]
impl Operation for GetVms {
    fn name(&self) -> &'static str {
        GET_VMS
    }

    async fn execute(&self, ctx: &ExecContext) -> Result<Outcome> {
        let instances = ctx.client().instances(ctx.token(), None).await?;

        // Group per organisation, preserving encounter order.
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        for vm in &instances {
            let line = instance_line(vm);
            match groups.iter().position(|(org, _)| *org == vm.customer_name) {
                Some(i) => groups[i].1.push(line),
                None => groups.push((vm.customer_name.clone(), vec![line])),
            }
        }

        let mut listing = String::new();
        for (org, lines) in &groups {
            listing.push_str(&format!("\nOrganisation '{org}':"));
            for line in lines {
                listing.push_str(&format!("\n    {line}"));
            }
        }

        let statement = match instances.len() {
            0 => "You don't have any virtual machines.".to_string(),
            1 => format!("You have 1 virtual machine in total.{listing}"),
            n => format!("You have {n} virtual machines in total.{listing}"),
        };
        Ok(Outcome::text(statement))
    }
}

pub struct GetOrganisations;

#[async_trait]
impl Operation for GetOrganisations {
    fn name(&self) -> &'static str {
        GET_ORGANISATIONS
    }

    async fn execute(&self, ctx: &ExecContext) -> Result<Outcome> {
        let organisations = ctx.client().customers(ctx.token()).await?;
        let names: Vec<String> = organisations.iter().map(|org| org.name.clone()).collect();

        let statement = match names.len() {
            0 => "You aren't part of any organisations.".to_string(),
            1 => format!(
                "You are part of 1 organisation. The organisation is {}",
                names[0]
            ),
            n => format!(
                "You are part of {n} organisations. They are {}",
                names.join(", ")
            ),
        };
        Ok(Outcome::text(statement))
    }
}
