//! Advisory generator caching and failure behaviour

use advisor_ai::{
    build_prompt, AdvisoryCache, AdvisoryGenerator, CompletionClient, HttpCompletionClient,
};
use advisor_model::{Advisor, AdvisoryError, AdvisoryPrompt, LeadRequest};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Completion client replaying scripted responses
#[derive(Default)]
struct Scripted {
    responses: Mutex<VecDeque<Result<String, AdvisoryError>>>,
    prompts: Mutex<Vec<AdvisoryPrompt>>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(responses: Vec<Result<String, AdvisoryError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        })
    }
}

#[async_trait]
impl CompletionClient for Scripted {
    async fn complete(&self, prompt: &AdvisoryPrompt) -> Result<String, AdvisoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AdvisoryError::Transport("script exhausted".to_string())))
    }
}

fn lead() -> LeadRequest {
    LeadRequest::new("A", "a@x.com", "2BR near beach")
        .with_region("Al Rawda")
        .with_budget(Some(200_000), Some(400_000))
}

#[tokio::test]
async fn identical_leads_call_the_service_once() {
    let client = Scripted::new(vec![Ok("  Consider Al Rawda; ROI ~7%.\n".to_string())]);
    let generator = AdvisoryGenerator::new(client.clone(), AdvisoryCache::default());

    let first = generator.advise(&lead()).await.unwrap();
    let second = generator.advise(&lead()).await.unwrap();

    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    assert_eq!(first.text, "Consider Al Rawda; ROI ~7%.");
    assert_eq!(first.text, second.text);
    assert_eq!(first.source_prompt, build_prompt(&lead()));
    assert_eq!(client.prompts.lock().unwrap()[0], build_prompt(&lead()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_leads_share_one_call() {
    let client = Scripted::new(vec![Ok("shared advice".to_string())]);
    let generator = Arc::new(AdvisoryGenerator::new(client.clone(), AdvisoryCache::default()));

    let runs = (0..10).map(|_| {
        let generator = Arc::clone(&generator);
        async move { generator.advise(&lead()).await }
    });
    let results = futures::future::join_all(runs).await;

    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    for result in results {
        assert_eq!(result.unwrap().text, "shared advice");
    }
}

#[tokio::test]
async fn failure_is_retried_on_next_call() {
    let client = Scripted::new(vec![
        Err(AdvisoryError::Status {
            status: 500,
            body: String::new(),
        }),
        Ok("second time lucky".to_string()),
    ]);
    let generator = AdvisoryGenerator::new(client.clone(), AdvisoryCache::default());

    let err = generator.advise(&lead()).await.unwrap_err();
    assert!(matches!(err, AdvisoryError::Status { status: 500, .. }));
    assert!(!generator.cache().contains(&build_prompt(&lead())));

    let ok = generator.advise(&lead()).await.unwrap();
    assert_eq!(ok.text, "second time lucky");
    assert_eq!(client.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn blank_completion_is_an_error_not_advice() {
    let client = Scripted::new(vec![Ok("   ".to_string())]);
    let generator = AdvisoryGenerator::new(client, AdvisoryCache::default());

    let err = generator.advise(&lead()).await.unwrap_err();
    assert!(matches!(err, AdvisoryError::MalformedResponse(_)));
}

#[tokio::test]
async fn different_filters_are_different_requests() {
    let client = Scripted::new(vec![Ok("one".to_string()), Ok("two".to_string())]);
    let generator = AdvisoryGenerator::new(client.clone(), AdvisoryCache::default());

    generator.advise(&lead()).await.unwrap();
    generator
        .advise(&lead().with_region("Al Jurf"))
        .await
        .unwrap();

    assert_eq!(client.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn http_generator_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Look at Emirates City."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpCompletionClient::new(
        format!("{}/v1/chat/completions", server.uri()),
        "m",
        "k",
        Duration::from_secs(5),
    )
    .unwrap();
    let generator = AdvisoryGenerator::new(Arc::new(client), AdvisoryCache::new(10));

    assert_eq!(generator.advise(&lead()).await.unwrap().text, "Look at Emirates City.");
    assert_eq!(generator.advise(&lead()).await.unwrap().text, "Look at Emirates City.");
}
