//! Orchestrator behaviour against a scripted backend.

use std::sync::Arc;

use deploy_studio::{GenerationMode, Studio, StudioConfig, StudioError};
use serde_json::json;
use studio_gemini::backend::mock::MockBackend;
use studio_gemini::{ClientError, GenerationResponse, Modality, Model, Tool};

fn text_response(text: &str) -> GenerationResponse {
    serde_json::from_value(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    }))
    .unwrap()
}

fn project_json() -> String {
    json!({
        "projectName": "KalkulatorAPI",
        "description": "REST API kalkulator dengan riwayat",
        "files": [
            { "filename": "app.py", "content": "from flask import Flask\napp = Flask(__name__)\n", "language": "python" },
            { "filename": "requirements.txt", "content": "flask==3.0.0\n", "language": "text" },
            { "filename": "README.md", "content": "# Kalkulator\n", "language": "markdown" }
        ],
        "setupInstructions": "1. pip install -r requirements.txt\n2. python app.py"
    })
    .to_string()
}

fn studio(backend: &Arc<MockBackend>) -> Studio {
    Studio::with_backend(StudioConfig::default().with_api_key("test"), backend.clone())
}

#[tokio::test]
async fn thinking_mode_sets_budget_without_output_cap() {
    let backend = Arc::new(MockBackend::new().with_response(text_response(&project_json())));

    studio(&backend).generate_project("kalkulator", GenerationMode::Thinking).await.unwrap();

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    let (model, request) = &requests[0];
    assert_eq!(model, &Model::Gemini25Pro);
    let config = request.generation_config.as_ref().unwrap();
    assert_eq!(config.thinking_config.as_ref().unwrap().thinking_budget, Some(32768));
    assert_eq!(config.max_output_tokens, None);
    assert_eq!(config.temperature, Some(0.2));
}

#[tokio::test]
async fn each_mode_targets_its_model() {
    for (mode, expected) in [
        (GenerationMode::Fast, Model::Gemini25FlashLite),
        (GenerationMode::Standard, Model::Gemini25Flash),
        (GenerationMode::Thinking, Model::Gemini25Pro),
    ] {
        let backend = Arc::new(MockBackend::new().with_response(text_response(&project_json())));
        studio(&backend).generate_project("todo list", mode).await.unwrap();

        let (model, request) = backend.requests().remove(0);
        assert_eq!(model, expected, "{mode}");
        let config = request.generation_config.unwrap();
        if mode != GenerationMode::Thinking {
            assert_eq!(config.max_output_tokens, Some(8192));
            assert!(config.thinking_config.is_none());
        }
    }
}

#[tokio::test]
async fn generation_requests_structured_output() {
    let backend = Arc::new(MockBackend::new().with_response(text_response(&project_json())));

    studio(&backend).generate_project("  todo list  ", GenerationMode::Standard).await.unwrap();

    let (_, request) = backend.requests().remove(0);
    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "todo list");
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    let instruction = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
    assert!(instruction.contains("Senior Python Engineer"));
}

#[tokio::test]
async fn generated_files_are_returned_verbatim_in_order() {
    let backend = Arc::new(MockBackend::new().with_response(text_response(&project_json())));

    let project =
        studio(&backend).generate_project("kalkulator", GenerationMode::Fast).await.unwrap();

    let names: Vec<&str> = project.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["app.py", "requirements.txt", "README.md"]);
    assert_eq!(project.files[0].content, "from flask import Flask\napp = Flask(__name__)\n");
    assert_eq!(project.setup_instructions, "1. pip install -r requirements.txt\n2. python app.py");
}

#[tokio::test]
async fn empty_file_list_is_contract_violation() {
    let body = json!({
        "projectName": "x", "description": "y", "files": [], "setupInstructions": "z"
    });
    let backend = Arc::new(MockBackend::new().with_response(text_response(&body.to_string())));

    let err = studio(&backend).generate_project("x", GenerationMode::Fast).await.unwrap_err();
    assert!(matches!(err, StudioError::ContractViolation(_)));
}

#[tokio::test]
async fn non_json_answer_is_contract_violation() {
    let backend = Arc::new(MockBackend::new().with_response(text_response("Sure! Here is your app")));

    let err = studio(&backend).generate_project("x", GenerationMode::Fast).await.unwrap_err();
    assert!(matches!(err, StudioError::ContractViolation(_)));
}

#[tokio::test]
async fn transport_failure_is_reported() {
    let backend = Arc::new(MockBackend::new().with_error(ClientError::BadResponse {
        code: 503,
        description: Some("overloaded".into()),
    }));

    let err = studio(&backend).generate_project("x", GenerationMode::Fast).await.unwrap_err();
    assert!(matches!(err, StudioError::Transport(ClientError::BadResponse { code: 503, .. })));
    assert!(err.user_message().contains("503"));
}

#[tokio::test]
async fn blank_prompt_sends_nothing() {
    let backend = Arc::new(MockBackend::new());

    let err = studio(&backend).generate_project("   ", GenerationMode::Fast).await.unwrap_err();

    assert!(matches!(err, StudioError::InvalidInput(_)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn missing_key_is_config_error_for_every_operation() {
    let studio = Studio::new(StudioConfig::default()).unwrap();

    let err = studio.generate_project("todo", GenerationMode::Fast).await.unwrap_err();
    assert!(err.is_config());
    let err = studio.research_tech_stack("flask").await.unwrap_err();
    assert!(err.is_config());
    let err = studio.synthesize_speech("hello").await.unwrap_err();
    assert!(err.is_config());
}

#[tokio::test]
async fn research_uses_search_and_dedups_sources() {
    let response: GenerationResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": { "parts": [{ "text": "Use Gunicorn behind Nginx." }] },
            "groundingMetadata": {
                "webSearchQueries": ["flask production server"],
                "groundingChunks": [
                    { "web": { "uri": "https://flask.palletsprojects.com/deploying/", "title": "Deploying Flask" } },
                    { "web": { "uri": "https://gunicorn.org", "title": "Gunicorn" } },
                    { "web": { "uri": "https://flask.palletsprojects.com/deploying/", "title": "Deploying Flask" } }
                ]
            }
        }]
    }))
    .unwrap();
    let backend = Arc::new(MockBackend::new().with_response(response));

    let result = studio(&backend).research_tech_stack("production flask").await.unwrap();

    assert_eq!(result.text, "Use Gunicorn behind Nginx.");
    let uris: Vec<&str> = result.sources.iter().map(|s| s.uri.as_str()).collect();
    assert_eq!(uris, vec!["https://flask.palletsprojects.com/deploying/", "https://gunicorn.org"]);

    let (model, request) = backend.requests().remove(0);
    assert_eq!(model, Model::Gemini25Flash);
    assert_eq!(request.tools, Some(vec![Tool::google_search()]));
    let body = serde_json::to_value(&request).unwrap();
    assert!(body["contents"][0]["parts"][0]["text"].as_str().unwrap().contains("production flask"));
}

#[tokio::test]
async fn research_without_grounding_has_no_sources() {
    let backend = Arc::new(MockBackend::new().with_response(text_response("Use Django.")));

    let result = studio(&backend).research_tech_stack("web framework").await.unwrap();

    assert_eq!(result.text, "Use Django.");
    assert!(result.sources.is_empty());
}

#[tokio::test]
async fn speech_requests_audio_with_fixed_voice() {
    let response: GenerationResponse = serde_json::from_value(json!({
        "candidates": [{ "content": { "parts": [
            { "inlineData": { "mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAABAA==" } }
        ] } }]
    }))
    .unwrap();
    let backend = Arc::new(MockBackend::new().with_response(response));

    let audio = studio(&backend).synthesize_speech("pip install flask").await.unwrap();

    assert_eq!(audio.pcm, vec![0, 0, 1, 0]);
    assert_eq!(audio.sample_rate, 24_000);

    let (model, request) = backend.requests().remove(0);
    assert_eq!(model, Model::Gemini25FlashPreviewTts);
    let config = request.generation_config.unwrap();
    assert_eq!(config.response_modalities, Some(vec![Modality::Audio]));
    let voice = config.speech_config.unwrap().voice_config.unwrap().prebuilt_voice_config.unwrap();
    assert_eq!(voice.voice_name, "Kore");
}

#[tokio::test]
async fn speech_without_audio_part_is_no_audio() {
    let backend = Arc::new(MockBackend::new().with_response(text_response("I cannot speak")));

    let err = studio(&backend).synthesize_speech("hello").await.unwrap_err();
    assert!(matches!(err, StudioError::NoAudio));
}
