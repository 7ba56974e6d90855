//! Prompt construction and reply parsing for post generation.

use anthropic_client::strip_code_fence;
use serde::Deserialize;

use crate::error::PipelineError;

/// Structured reply expected from the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedContent {
    pub title: String,
    #[serde(rename = "content")]
    pub body: String,
    pub tags: String,
    pub image_prompt: String,
}

/// Build the poem-writing prompt.
///
/// The model is told to answer with a bare JSON object and to copy `tags`
/// verbatim.
pub fn build_prompt(topic: &str, source_contents: &str, tags: &str) -> String {
    format!(
        r#"당신은 전문 시인입니다. 주어진 주제에 대해 자유형태의 시를 작성해주세요.
- 주제: {topic}
- 내용: {source_contents}를 기반으로 여기에 내용을 덧붙여서 작성해 주세요.

반드시 다음 JSON 형식으로만 응답해주세요 (다른 텍스트 없이 순수 JSON만)
태그는 지정된 태그만 사용해 주세요. 변경하지 않습니다.
{{
  "title": "매력적인 제목",
  "content": "마크다운 형식의 시 모양의 본문 (50자 이상 150자 이하), [1], [2]와 같은 출처 표시를 하지 말아 주세요.",
  "tags": "{tags}",
  "image_prompt": "이 글에 어울리는 썸네일 이미지를 위한 영문 프롬프트"
}}
"#
    )
}

/// Parse a model reply, fenced or not, into the four content fields.
pub fn parse_reply(reply: &str) -> Result<GeneratedContent, PipelineError> {
    let json = strip_code_fence(reply);
    serde_json::from_str(json)
        .map_err(|e| PipelineError::Generation(format!("invalid model reply: {}", e)))
}
