//! Full turn-by-turn flows through the dispatcher: classify, execute,
//! pause into a wizard, resume by token, and the error conversions at this
//! layer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stratus_backend::{BackendError, CloudClient};
use stratus_dispatch::{
    DispatchError, Dispatcher, IntentClassifier, OperationRegistry, Result, SessionStore,
};
use stratus_protocol::ResponseItem;
use stratus_resolver::EntityResolver;

/// Classifier with canned replies; anything unknown gets small talk.
struct StubClassifier {
    replies: HashMap<String, String>,
}

impl StubClassifier {
    fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            replies: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl IntentClassifier for StubClassifier {
    async fn classify(&self, utterance: &str) -> Result<String> {
        Ok(self
            .replies
            .get(utterance)
            .cloned()
            .unwrap_or_else(|| "Hi there!".to_string()))
    }
}

fn dispatcher(server: &MockServer, classifier: StubClassifier) -> Dispatcher {
    let client = CloudClient::new(server.uri(), Duration::from_secs(5)).unwrap();
    Dispatcher::new(
        OperationRegistry::standard(),
        Box::new(classifier),
        SessionStore::new(Duration::from_secs(300)),
        Arc::new(client),
        Arc::new(EntityResolver::default()),
    )
}

fn text(items: &[ResponseItem]) -> String {
    match items {
        [ResponseItem::Text(data)] => data.clone(),
        other => panic!("expected one text item, got {other:?}"),
    }
}

#[tokio::test]
async fn conversational_reply_passes_through_verbatim() {
    let server = MockServer::start().await;
    let dispatcher = dispatcher(&server, StubClassifier::new(&[]));

    let items = dispatcher.respond("hello", Some("tok")).await.unwrap();
    assert_eq!(text(&items), "Hi there!");
}

#[tokio::test]
async fn my_projects_for_an_empty_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    let dispatcher = dispatcher(
        &server,
        StubClassifier::new(&[("my projects", "REQUEST~get_projects")]),
    );

    let items = dispatcher.respond("my projects", Some("tok")).await.unwrap();
    assert_eq!(
        serde_json::to_value(&items).unwrap(),
        serde_json::json!([{"type": "text", "data": "You don't have any projects."}])
    );
}

#[tokio::test]
async fn unknown_operation_is_a_system_error() {
    let server = MockServer::start().await;
    let dispatcher = dispatcher(
        &server,
        StubClassifier::new(&[("do magic", "REQUEST~get_weather")]),
    );

    let err = dispatcher.respond("do magic", Some("tok")).await.unwrap_err();
    assert!(matches!(err, DispatchError::UnknownOperation(name) if name == "get_weather"));
}

#[tokio::test]
async fn backend_api_error_message_is_passed_through_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers/"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"detail": "System error"})),
        )
        .mount(&server)
        .await;
    let dispatcher = dispatcher(
        &server,
        StubClassifier::new(&[("my projects", "REQUEST~get_projects")]),
    );

    let items = dispatcher.respond("my projects", Some("tok")).await.unwrap();
    assert_eq!(text(&items), "System error");
}

#[tokio::test]
async fn rejected_credential_escapes_for_the_transport_layer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let dispatcher = dispatcher(
        &server,
        StubClassifier::new(&[("my projects", "REQUEST~get_projects")]),
    );

    let err = dispatcher.respond("my projects", Some("bad")).await.unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Backend(BackendError::InvalidToken)
    ));
}

#[tokio::test]
async fn wizard_without_a_caller_token_fails_fast() {
    let server = MockServer::start().await;
    let dispatcher = dispatcher(
        &server,
        StubClassifier::new(&[("create a vm", "REQUEST~create_vm")]),
    );

    let err = dispatcher.respond("create a vm", None).await.unwrap_err();
    assert!(matches!(err, DispatchError::MissingToken));
}

async fn mount_vm_creation_backend(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "Web", "services": []}
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/openstacktenant-images/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "debian"}, {"name": "centos7"}
        ])))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/openstacktenant-instances/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn create_vm_collects_answers_across_turns() {
    let server = MockServer::start().await;
    mount_vm_creation_backend(&server).await;
    let dispatcher = dispatcher(
        &server,
        StubClassifier::new(&[("create a vm", "REQUEST~create_vm")]),
    );
    let token = Some("alice");

    let step = dispatcher.respond("create a vm", token).await.unwrap();
    assert_eq!(text(&step), "Do you want to create a virtual machine? [y]");

    let step = dispatcher.respond("y", token).await.unwrap();
    assert_eq!(text(&step), "What should the virtual machine be called?");

    let step = dispatcher.respond("chat-prod", token).await.unwrap();
    assert_eq!(
        text(&step),
        "Which project should the virtual machine go in? [Web]"
    );

    let step = dispatcher.respond("Web", token).await.unwrap();
    assert_eq!(
        text(&step),
        "Which operating system image? [debian, centos7]"
    );

    let step = dispatcher.respond("debian", token).await.unwrap();
    assert_eq!(
        text(&step),
        "Alright! Creating virtual machine 'chat-prod' in project 'Web'."
    );

    // The wizard is gone: the next message goes to the classifier again.
    assert!(dispatcher.sessions().is_empty());
    let step = dispatcher.respond("hello", token).await.unwrap();
    assert_eq!(text(&step), "Hi there!");
}

#[tokio::test]
async fn one_bad_answer_ends_the_conversation() {
    let server = MockServer::start().await;
    mount_vm_creation_backend(&server).await;
    let dispatcher = dispatcher(
        &server,
        StubClassifier::new(&[("create a vm", "REQUEST~create_vm")]),
    );
    let token = Some("alice");

    dispatcher.respond("create a vm", token).await.unwrap();
    let step = dispatcher.respond("n", token).await.unwrap();
    assert_eq!(text(&step), "Not creating a virtual machine.");
    assert!(dispatcher.sessions().is_empty());
}

#[tokio::test]
async fn sessions_are_isolated_per_token() {
    let server = MockServer::start().await;
    mount_vm_creation_backend(&server).await;
    Mock::given(method("GET"))
        .and(path("/customers/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    let dispatcher = dispatcher(
        &server,
        StubClassifier::new(&[
            ("create a vm", "REQUEST~create_vm"),
            ("my projects", "REQUEST~get_projects"),
        ]),
    );

    // Alice is mid-wizard; Bob's turn must not touch her session.
    dispatcher.respond("create a vm", Some("alice")).await.unwrap();
    let bob = dispatcher.respond("my projects", Some("bob")).await.unwrap();
    assert_eq!(text(&bob), "You don't have any projects.");

    // Alice's wizard is still where she left it.
    let alice = dispatcher.respond("y", Some("alice")).await.unwrap();
    assert_eq!(text(&alice), "What should the virtual machine be called?");
}

#[tokio::test]
async fn seeded_wire_parameters_skip_their_questions() {
    let server = MockServer::start().await;
    mount_vm_creation_backend(&server).await;
    let dispatcher = dispatcher(
        &server,
        StubClassifier::new(&[(
            "create a debian vm called chat-prod",
            "REQUEST~create_vm~name=chat-prod~image=debian",
        )]),
    );
    let token = Some("alice");

    let step = dispatcher
        .respond("create a debian vm called chat-prod", token)
        .await
        .unwrap();
    assert_eq!(text(&step), "Do you want to create a virtual machine? [y]");

    let step = dispatcher.respond("y", token).await.unwrap();
    assert_eq!(
        text(&step),
        "Which project should the virtual machine go in? [Web]"
    );

    let step = dispatcher.respond("Web", token).await.unwrap();
    assert_eq!(
        text(&step),
        "Alright! Creating virtual machine 'chat-prod' in project 'Web'."
    );
}
