use crate::error::Failure;
use crate::oracle::{ChatModel, OpenAiChat, OpenAiConfig};
use crate::prelude::{eprintln, *};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use recode_core::refactor::{
    format_instructions, parse_output, render_prompt, CodeOutput, RESPONSE_FIELDS,
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

/// Process-wide state, immutable after startup and shared by every request.
pub struct AppState {
    oracle: Arc<dyn ChatModel>,
    format_instructions: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct CodeInput {
    pub code: String,
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    // Fatal before any listener opens: no request is served without a key.
    let config = OpenAiConfig::from_env()?;
    let oracle = OpenAiChat::new(&config)?;

    if global.verbose {
        eprintln!("Chat model: {}", config.model);
        eprintln!("Chat API base: {}", config.base_url);
    }

    let state = Arc::new(AppState {
        oracle: Arc::new(oracle),
        format_instructions: format_instructions(RESPONSE_FIELDS),
    });

    let addr = format!("{}:{}", options.host, options.port);
    let app_router = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    if global.verbose {
        eprintln!("Refactor server listening on http://{}", addr);
        eprintln!("Refactor endpoint: http://{}/refactor-code/", addr);
    }

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/refactor-code/", post(refactor_handler))
        .layer(cors)
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

async fn refactor_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CodeInput>,
) -> Response {
    match refactor_data(state.oracle.as_ref(), &state.format_instructions, &input.code).await {
        Ok(output) => (StatusCode::OK, Json(output)).into_response(),
        Err(failure) => failure_response(failure),
    }
}

/// Run one refactor request against the model (shared by the handler and tests).
///
/// One attempt, no timeout, no retry: the first outcome is final.
pub async fn refactor_data(
    oracle: &dyn ChatModel,
    format_instructions: &str,
    code: &str,
) -> Result<CodeOutput, Failure> {
    let prompt = render_prompt(code, format_instructions);

    let content = oracle
        .complete(&prompt)
        .await
        .map_err(|e| Failure::Oracle(e.to_string()))?;

    if content.is_empty() {
        return Err(Failure::EmptyOutput);
    }

    parse_output(&content).map_err(|_| Failure::BadParse)
}

fn failure_response(failure: Failure) -> Response {
    let status = failure.status();
    (status, Json(failure.into_body())).into_response()
}

/// Outermost boundary: anything that escapes the handler still renders as
/// the uniform JSON error body.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    failure_response(Failure::Internal(detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    enum MockOracle {
        Reply(&'static str),
        Boom,
    }

    #[async_trait::async_trait]
    impl ChatModel for MockOracle {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            match self {
                MockOracle::Reply(text) => Ok((*text).to_string()),
                MockOracle::Boom => Err(eyre!("boom")),
            }
        }
    }

    fn instructions() -> String {
        format_instructions(RESPONSE_FIELDS)
    }

    const WELL_FORMED: &str = "```json\n{\n\t\"refactor_code\": \"def add_one(x):\\n    return x + 1\",\n\t\"language\": \"python\"\n}\n```";

    #[tokio::test]
    async fn test_well_formed_reply_populates_both_fields() {
        let oracle = MockOracle::Reply(WELL_FORMED);
        let output = refactor_data(&oracle, &instructions(), "def f(x): return x+1")
            .await
            .unwrap();
        assert_eq!(output.refactor_code, "def add_one(x):\n    return x + 1");
        assert_eq!(output.language, "python");
    }

    #[tokio::test]
    async fn test_success_body_serializes_with_both_keys() {
        let oracle = MockOracle::Reply(WELL_FORMED);
        let output = refactor_data(&oracle, &instructions(), "def f(x): return x+1")
            .await
            .unwrap();
        let body = serde_json::to_value(&output).unwrap();
        assert_eq!(body["refactor_code"], "def add_one(x):\n    return x + 1");
        assert_eq!(body["language"], "python");
    }

    #[tokio::test]
    async fn test_empty_reply_maps_to_not_found() {
        let oracle = MockOracle::Reply("");
        let failure = refactor_data(&oracle, &instructions(), "fn main() {}")
            .await
            .unwrap_err();
        assert!(matches!(failure, Failure::EmptyOutput));
        assert_eq!(failure.status(), StatusCode::NOT_FOUND);
        assert_eq!(failure.into_body().status_code, 404);
    }

    #[tokio::test]
    async fn test_oracle_error_maps_to_internal_server_error() {
        let oracle = MockOracle::Boom;
        let failure = refactor_data(&oracle, &instructions(), "fn main() {}")
            .await
            .unwrap_err();
        assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = failure.into_body();
        assert_eq!(body.status_code, 500);
        assert!(body.message.contains("boom"));
    }

    #[tokio::test]
    async fn test_reply_missing_language_maps_to_bad_parse() {
        let oracle = MockOracle::Reply("```json\n{\"refactor_code\": \"fn main() {}\"}\n```");
        let failure = refactor_data(&oracle, &instructions(), "fn main() {}")
            .await
            .unwrap_err();
        assert!(matches!(failure, Failure::BadParse));
        let body = failure.into_body();
        assert_eq!(body.status_code, 500);
        assert_eq!(body.message, "Unexpected result from chat API");
    }

    #[tokio::test]
    async fn test_free_text_reply_maps_to_bad_parse() {
        let oracle = MockOracle::Reply("I refuse to refactor this.");
        let failure = refactor_data(&oracle, &instructions(), "fn main() {}")
            .await
            .unwrap_err();
        assert!(matches!(failure, Failure::BadParse));
    }

    #[tokio::test]
    async fn test_empty_code_is_forwarded_to_the_oracle() {
        let oracle = MockOracle::Reply(WELL_FORMED);
        let output = refactor_data(&oracle, &instructions(), "").await.unwrap();
        assert_eq!(output.language, "python");
    }

    struct RecordingOracle {
        prompts: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl ChatModel for RecordingOracle {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(WELL_FORMED.to_string())
        }
    }

    #[tokio::test]
    async fn test_same_code_sends_byte_identical_prompts() {
        let oracle = RecordingOracle {
            prompts: std::sync::Mutex::new(Vec::new()),
        };
        let instructions = instructions();
        refactor_data(&oracle, &instructions, "def f(x): return x+1")
            .await
            .unwrap();
        refactor_data(&oracle, &instructions, "def f(x): return x+1")
            .await
            .unwrap();

        let prompts = oracle.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], prompts[1]);
        assert!(prompts[0].contains("def f(x): return x+1"));
    }

    #[test]
    fn test_panic_renders_as_internal_server_error() {
        let response = handle_panic(Box::new("handler blew up".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
