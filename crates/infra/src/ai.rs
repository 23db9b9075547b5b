//! # チャット補完 API クライアント
//!
//! OpenAI 互換の `POST {base_url}/chat/completions` を呼び出し、
//! 先頭の選択肢のテキストを返す。
//!
//! API キーは呼び出し時に検査する。キーがない場合はリクエストを送らず
//! [`GenerationError::NotConfigured`] を返す。

use async_trait::async_trait;
use nicheshunter_domain::summary::GenerationError;
use serde::{Deserialize, Serialize};

/// `OPENAI_BASE_URL` 未設定時のベース URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// `OPENAI_MODEL` 未設定時のモデル
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";

const TEMPERATURE: f32 = 0.7;
const MAX_COMPLETION_TOKENS: u32 = 500;

/// チャット補完クライアントトレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    /// システムプロンプトとユーザープロンプトを送り、応答テキストを返す
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError>;
}

fn request_failed(err: reqwest::Error) -> GenerationError {
    GenerationError::RequestFailed(err.to_string())
}

// --- リクエスト/レスポンス型 ---

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model:                 &'a str,
    messages:              [ChatMessage<'a>; 2],
    temperature:           f32,
    max_completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role:    &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

/// OpenAI 互換 API のクライアント実装
pub struct OpenAiClient {
    api_key:  Option<String>,
    model:    String,
    base_url: String,
    client:   reqwest::Client,
}

impl OpenAiClient {
    /// # 引数
    ///
    /// - `api_key`: API キー。`None` の場合は呼び出しごとに設定エラーを返す
    /// - `model`: モデル名（例: `gpt-4.1-mini`）
    /// - `base_url`: API のベース URL（例: `https://api.openai.com/v1`）
    pub fn new(api_key: Option<String>, model: &str, base_url: &str) -> Self {
        Self {
            api_key:  api_key.filter(|key| !key.trim().is_empty()),
            model:    model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client:   reqwest::Client::new(),
        }
    }

    /// API キーが設定されているかどうか
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl ChatCompletionClient for OpenAiClient {
    #[tracing::instrument(skip_all, fields(model = %self.model), level = "debug")]
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::NotConfigured("OPENAI_API_KEY".to_string()))?;

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model:                 &self.model,
            messages:              [
                ChatMessage {
                    role:    "system",
                    content: system,
                },
                ChatMessage {
                    role:    "user",
                    content: user,
                },
            ],
            temperature:           TEMPERATURE,
            max_completion_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::RequestFailed(format!(
                "予期しないステータス {status}: {body}"
            )));
        }

        let body = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| GenerationError::InvalidReply(e.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::InvalidReply("応答が空です".to_string()))
    }
}
