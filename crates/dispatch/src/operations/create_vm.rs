//! Virtual machine creation: the one operation that usually cannot run
//! from the utterance alone, so it pauses into a wizard.

use std::collections::BTreeMap;

use async_trait::async_trait;

use stratus_backend::CreateInstance;
use stratus_protocol::{OperationToken, ResponseItem};

use crate::context::ExecContext;
use crate::error::Result;
use crate::operation::{Operation, Outcome};
use crate::wizard::{CandidateProvider, FixedCandidates, Qa, Wizard, WizardFinish};

use super::CREATE_VM;

const CONFIRM_PROMPT: &str = "Do you want to create a virtual machine?";
const NAME_PROMPT: &str = "What should the virtual machine be called?";
const PROJECT_PROMPT: &str = "Which project should the virtual machine go in?";
const IMAGE_PROMPT: &str = "Which operating system image?";
const BAD_END: &str = "Not creating a virtual machine.";

/// Names of the caller's projects.
struct ProjectCandidates;

#[async_trait]
impl CandidateProvider for ProjectCandidates {
    async fn candidates(
        &self,
        ctx: &ExecContext,
        _params: &BTreeMap<String, String>,
    ) -> Result<Vec<String>> {
        let projects = ctx.client().projects(ctx.token(), None).await?;
        Ok(projects.into_iter().map(|p| p.name).collect())
    }
}

/// Images available to the project chosen two questions earlier. Invoked
/// only after `project` is in the parameter map.
struct ImageCandidates;

#[async_trait]
impl CandidateProvider for ImageCandidates {
    async fn candidates(
        &self,
        ctx: &ExecContext,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<String>> {
        let project = params.get("project").map(String::as_str);
        let images = ctx.client().images(ctx.token(), project).await?;
        Ok(images.into_iter().map(|i| i.name).collect())
    }
}

struct SubmitCreateVm;

#[async_trait]
impl WizardFinish for SubmitCreateVm {
    async fn finish(
        &self,
        ctx: &ExecContext,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<ResponseItem>> {
        let request = CreateInstance {
            name: params.get("name").cloned().unwrap_or_default(),
            project: params.get("project").cloned().unwrap_or_default(),
            image: params.get("image").cloned().unwrap_or_default(),
        };
        ctx.client().create_instance(ctx.token(), &request).await?;
        Ok(vec![ResponseItem::text(format!(
            "Alright! Creating virtual machine '{}' in project '{}'.",
            request.name, request.project
        ))])
    }
}

/// Builds the question sequence; answers already present in the wire token
/// are consumed as seeds, so a fully-parameterized token completes without
/// asking anything.
pub struct CreateVm {
    seeds: BTreeMap<String, String>,
}

impl CreateVm {
    pub fn from_token(token: &OperationToken) -> Self {
        let seeds = token
            .parameters()
            .iter()
            .filter_map(|(key, value)| value.clone().map(|v| (key.clone(), v)))
            .collect();
        Self { seeds }
    }

    fn wizard(&self) -> Wizard {
        Wizard::new(
            vec![
                ("continue", Qa::one_of(CONFIRM_PROMPT, Box::new(FixedCandidates::of(&["y"])))),
                ("name", Qa::free_form(NAME_PROMPT)),
                ("project", Qa::one_of(PROJECT_PROMPT, Box::new(ProjectCandidates))),
                ("image", Qa::one_of(IMAGE_PROMPT, Box::new(ImageCandidates))),
            ],
            BAD_END,
            Box::new(SubmitCreateVm),
        )
        .with_seeds(self.seeds.clone())
    }
}

#[async_trait]
impl Operation for CreateVm {
    fn name(&self) -> &'static str {
        CREATE_VM
    }

    async fn execute(&self, _ctx: &ExecContext) -> Result<Outcome> {
        Ok(Outcome::NeedsInput(self.wizard()))
    }
}
