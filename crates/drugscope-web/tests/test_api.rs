//! Router-level tests with in-process fake backends.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use drugscope_config::Config;
use drugscope_llm::{LlmBackend, LlmError, LlmRequest, LlmResponse, UnconfiguredBackend};
use drugscope_molecules::{BindingError, BindingPredictor};
use drugscope_web::{router::build_router, state::AppState};

// ── Fakes ─────────────────────────────────────────────────────────────────────

struct FixedBinding(f64);

#[async_trait]
impl BindingPredictor for FixedBinding {
    async fn predict(&self, _drug: &str, _target: &str) -> Result<f64, BindingError> {
        Ok(self.0)
    }
    fn model_id(&self) -> &str { "fixed" }
}

struct SlowBinding;

#[async_trait]
impl BindingPredictor for SlowBinding {
    async fn predict(&self, _drug: &str, _target: &str) -> Result<f64, BindingError> {
        Err(BindingError::Timeout)
    }
    fn model_id(&self) -> &str { "slow" }
}

/// Records the last prompt and echoes a canned analysis.
#[derive(Default)]
struct RecordingLlm {
    last: Mutex<Option<LlmRequest>>,
}

#[async_trait]
impl LlmBackend for RecordingLlm {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let engine = req.engine.clone().unwrap_or_default();
        *self.last.lock().unwrap() = Some(req);
        Ok(LlmResponse { content: json!({"response": "looks fine"}), engine })
    }
    fn model_id(&self) -> &str { "recording" }
}

struct FailingLlm(u16);

#[async_trait]
impl LlmBackend for FailingLlm {
    async fn complete(&self, _req: LlmRequest) -> Result<LlmResponse, LlmError> {
        Err(LlmError::ApiError { status: self.0, message: "quota exceeded".into() })
    }
    fn model_id(&self) -> &str { "failing" }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn app_with(llm: Arc<dyn LlmBackend>, binding: Option<Arc<dyn BindingPredictor>>) -> Router {
    build_router(AppState::new(Config::default(), llm, binding))
}

fn app() -> Router {
    app_with(Arc::new(UnconfiguredBackend::new("test")), Some(Arc::new(FixedBinding(6.5))))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_root_lists_endpoints() {
    let (status, body) = send(app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Drug Analysis API");
    assert_eq!(body["endpoints"].as_object().unwrap().len(), 6);
}

#[tokio::test]
async fn test_lipinski_with_and_without_trailing_slash() {
    for uri in ["/lipinski", "/lipinski/"] {
        let (status, body) = send(app(), post(uri, json!({"smiles": "CC(=O)Oc1ccccc1C(=O)O"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["drug_likeness"], "Pass");
        assert_eq!(body["molecular_weight"], 180.042);
        assert_eq!(body["HBD"], 1);
        assert_eq!(body["HBA"], 3);
    }
}

#[tokio::test]
async fn test_lipinski_rejects_bad_input() {
    let (status, body) = send(app(), post("/lipinski/", json!({"smiles": ""}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "SMILES string cannot be empty");

    let (status, body) = send(app(), post("/lipinski/", json!({"smiles": "C1CC"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid SMILES string");

    let (status, body) = send(app(), post("/lipinski/", json!({"molecule": "CCO"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_admet_shape() {
    let (status, body) = send(app(), post("/admet/", json!({"smiles": "CC(=O)Oc1ccccc1C(=O)O"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["absorption"]["TPSA"], 63.6);
    assert_eq!(body["absorption"]["rotatable_bonds"], 3);
    assert_eq!(body["metabolism"]["risk_level"], "Low");
    assert_eq!(body["toxicity"]["risk_level"], "High");
}

#[tokio::test]
async fn test_generate_validates_num_samples() {
    for uri in ["/generate/?num_samples=0", "/generate/?num_samples=11", "/generate/?num_samples=abc"] {
        let (status, body) = send(app(), get(uri)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert!(body["detail"].is_string());
    }
}

#[tokio::test]
async fn test_generate_from_scratch() {
    let (status, body) = send(app(), get("/generate/?num_samples=2")).await;
    assert_eq!(status, StatusCode::OK);
    let molecules = body["generated_molecules"].as_array().unwrap();
    assert!(!molecules.is_empty() && molecules.len() <= 2);
    assert_eq!(body["num_molecules"], molecules.len());
}

#[tokio::test]
async fn test_generate_with_invalid_seed() {
    let (status, body) = send(app(), get("/generate?seed_smiles=C1CC")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid seed SMILES string");
}

#[tokio::test]
async fn test_binding_uses_predictor() {
    let (status, body) = send(app(), post("/binding/", json!({"drug": "CCO", "target": "MKTAYIAK"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "drug_smiles": "CCO",
            "target_sequence": "MKTAYIAK",
            "binding_score": 6.5,
            "message": "Higher scores indicate stronger predicted binding",
        })
    );
}

#[tokio::test]
async fn test_binding_errors() {
    let (status, body) = send(app(), post("/binding/", json!({"drug": "CCO", "target": ""}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Protein sequence cannot be empty");

    let unconfigured = app_with(Arc::new(UnconfiguredBackend::new("test")), None);
    let (status, _) = send(unconfigured, post("/binding/", json!({"drug": "CCO", "target": "MKT"}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let slow = app_with(Arc::new(UnconfiguredBackend::new("test")), Some(Arc::new(SlowBinding)));
    let (status, _) = send(slow, post("/binding/", json!({"drug": "CCO", "target": "MKT"}))).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn test_agent_combines_reports() {
    let (status, body) = send(app(), post("/agent/", json!({"drug": "CCO", "target": "MKT", "model_type": "CNN"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drug_likeness"]["drug_likeness"], "Pass");
    assert_eq!(body["binding_score"], 6.5);
    assert!(body["admet"]["absorption"].is_object());
}

#[tokio::test]
async fn test_agent_rejects_invalid_drug_before_binding() {
    let app = app_with(Arc::new(UnconfiguredBackend::new("test")), None);
    let (status, body) = send(app, post("/agent/", json!({"drug": "not smiles", "target": "MKT"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid SMILES string");
}

#[tokio::test]
async fn test_agent_ai_builds_prompt() {
    let llm = Arc::new(RecordingLlm::default());
    let app = app_with(llm.clone(), None);
    let request = json!({
        "instructions": "Suggest improvements",
        "drug_data": {"drug_smiles": "CCO", "binding_score": 5.0},
    });
    let (status, body) = send(app, post("/agentai/", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "Suggest improvements");
    assert_eq!(body["context"]["drug_smiles"], "CCO");
    assert_eq!(body["analysis"], json!({"response": "looks fine"}));
    assert_eq!(body["message"], "AI analysis completed successfully");

    let sent = llm.last.lock().unwrap().clone().unwrap();
    assert_eq!(sent.engine.as_deref(), Some("gpt4o"));
    assert!(sent.instructions.contains("- Drug SMILES: CCO"));
    assert!(sent.instructions.ends_with("User Question: Suggest improvements"));
}

#[tokio::test]
async fn test_agent_ai_error_passthrough() {
    let failing_app = app_with(Arc::new(FailingLlm(429)), None);
    let request = json!({"instructions": "q", "drug_data": {}, "llm_engine": "claude"});
    let (status, body) = send(failing_app, post("/agentai/", request)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["detail"], "AgentAI API error: quota exceeded");

    let (status, _) = send(app(), post("/agentai/", json!({"instructions": "q", "drug_data": {}}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
