//! Operations that first have to figure out WHICH entity the user meant.
//!
//! Each runs the resolver over the original utterance against a
//! backend-supplied name list before its main query. Resolution failure
//! short-circuits: the main query is never issued, and the two failure
//! modes (nothing extracted vs. extracted but unmatched) keep distinct
//! user-facing replies.

use async_trait::async_trait;

use stratus_backend::Organisation;
use stratus_resolver::best_match;

use crate::context::ExecContext;
use crate::error::Result;
use crate::operation::{Operation, Outcome};

use super::{
    distinct_names, instance_line, GET_PRIVATE_CLOUDS_BY_ORGANISATION,
    GET_SERVICES_BY_ORGANISATION, GET_VMS_BY_PROJECT_AND_ORGANISATION,
};

/// Outcome of matching utterance candidates against known entity names.
enum Resolution {
    Resolved { name: String, uuid: String },
    /// Extraction produced no candidate phrases at all.
    NoCandidates,
    /// Candidates existed but none cleared the match threshold.
    NoMatch { first_candidate: String },
}

fn resolve_against(candidates: &[String], known: &[(String, String)]) -> Resolution {
    if candidates.is_empty() {
        return Resolution::NoCandidates;
    }
    let names: Vec<&str> = known.iter().map(|(name, _)| name.as_str()).collect();
    match best_match(candidates, &names) {
        Some(name) => {
            let uuid = known
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, uuid)| uuid.clone())
                .unwrap_or_default();
            Resolution::Resolved { name, uuid }
        }
        None => Resolution::NoMatch {
            first_candidate: candidates[0].clone(),
        },
    }
}

/// Resolve the organisation named in the utterance against the caller's
/// customer list. Also hands back the fetched organisations so two-stage
/// flows don't query twice.
async fn resolve_organisation(
    ctx: &ExecContext,
) -> Result<(Vec<Organisation>, Vec<String>, Resolution)> {
    let organisations = ctx.client().customers(ctx.token()).await?;
    let candidates = ctx.resolver().extract_candidates(ctx.original()).await;
    let known: Vec<(String, String)> = organisations
        .iter()
        .map(|org| (org.name.clone(), org.uuid.clone()))
        .collect();
    let resolution = resolve_against(&candidates, &known);
    Ok((organisations, candidates, resolution))
}

fn organisation_extraction_failure() -> Outcome {
    Outcome::text(
        "Sorry, I wasn't able to find an organisation's name in your request! \
         Please write it out in capital case!",
    )
}

fn organisation_match_failure(first_candidate: &str) -> Outcome {
    Outcome::text(format!(
        "Sorry, I wasn't able to find an organisation with the name \"{first_candidate}\". \
         Please check that an organisation with that name exists."
    ))
}

pub struct GetServicesByOrganisation;

#[async_trait]
impl Operation for GetServicesByOrganisation {
    fn name(&self) -> &'static str {
        GET_SERVICES_BY_ORGANISATION
    }

    async fn execute(&self, ctx: &ExecContext) -> Result<Outcome> {
        let (_, _, resolution) = resolve_organisation(ctx).await?;
        let (org_name, uuid) = match resolution {
            Resolution::Resolved { name, uuid } => (name, uuid),
            Resolution::NoCandidates => return Ok(organisation_extraction_failure()),
            Resolution::NoMatch { first_candidate } => {
                return Ok(organisation_match_failure(&first_candidate))
            }
        };

        let projects = ctx.client().projects(ctx.token(), Some(&uuid)).await?;
        let names = distinct_names(
            projects
                .iter()
                .flat_map(|project| project.services.iter().map(|s| s.name.clone())),
        );

        let statement = match names.len() {
            0 => format!("You don't have any services in use in {org_name}."),
            1 => format!(
                "You have 1 service in use in {org_name}. The service is {}",
                names[0]
            ),
            n => format!(
                "You have {n} services in use in {org_name}. They are {}.",
                names.join(", ")
            ),
        };
        Ok(Outcome::text(statement))
    }
}

pub struct GetPrivateCloudsByOrganisation;

#[async_trait]
impl Operation for GetPrivateCloudsByOrganisation {
    fn name(&self) -> &'static str {
        GET_PRIVATE_CLOUDS_BY_ORGANISATION
    }

    async fn execute(&self, ctx: &ExecContext) -> Result<Outcome> {
        let (_, _, resolution) = resolve_organisation(ctx).await?;
        let (org_name, uuid) = match resolution {
            Resolution::Resolved { name, uuid } => (name, uuid),
            Resolution::NoCandidates => return Ok(organisation_extraction_failure()),
            Resolution::NoMatch { first_candidate } => {
                return Ok(organisation_match_failure(&first_candidate))
            }
        };

        let tenants = ctx.client().tenants(ctx.token(), &uuid).await?;
        let names: Vec<String> = tenants.iter().map(|t| t.name.clone()).collect();

        let statement = match names.len() {
            0 => format!("You don't have any private clouds in {org_name}."),
            1 => format!(
                "You have 1 private cloud in {org_name}.\nIt's name is {}.",
                names[0]
            ),
            n => format!(
                "You have {n} private clouds in {org_name}.\nTheir names are {}.",
                names.join(", ")
            ),
        };
        Ok(Outcome::text(statement))
    }
}

pub struct GetVmsByProjectAndOrganisation;

#[async_trait]
impl Operation for GetVmsByProjectAndOrganisation {
    fn name(&self) -> &'static str {
        GET_VMS_BY_PROJECT_AND_ORGANISATION
    }

    async fn execute(&self, ctx: &ExecContext) -> Result<Outcome> {
        let (organisations, candidates, resolution) = resolve_organisation(ctx).await?;
        let (org_name, _) = match resolution {
            Resolution::Resolved { name, uuid } => (name, uuid),
            Resolution::NoCandidates => return Ok(organisation_extraction_failure()),
            Resolution::NoMatch { first_candidate } => {
                return Ok(organisation_match_failure(&first_candidate))
            }
        };

        // Second stage: the project, among that organisation's projects.
        let known_projects: Vec<(String, String)> = organisations
            .iter()
            .find(|org| org.name == org_name)
            .map(|org| {
                org.projects
                    .iter()
                    .map(|p| (p.name.clone(), p.uuid.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let (project_name, project_uuid) = match resolve_against(&candidates, &known_projects) {
            Resolution::Resolved { name, uuid } => (name, uuid),
            Resolution::NoCandidates => return Ok(organisation_extraction_failure()),
            Resolution::NoMatch { first_candidate } => {
                return Ok(Outcome::text(format!(
                    "Sorry, I wasn't able to find a project with the name \"{first_candidate}\" \
                     in {org_name}. Please check that a project with that name exists."
                )))
            }
        };

        let instances = ctx
            .client()
            .instances(ctx.token(), Some(&project_uuid))
            .await?;

        let mut listing = String::new();
        for vm in &instances {
            listing.push_str(&format!("\n    {}", instance_line(vm)));
        }

        let statement = match instances.len() {
            0 => format!("You don't have any virtual machines in {project_name} ({org_name})."),
            1 => format!("You have 1 virtual machine in {project_name} ({org_name}).{listing}"),
            n => format!("You have {n} virtual machines in {project_name} ({org_name}).{listing}"),
        };
        Ok(Outcome::text(statement))
    }
}
