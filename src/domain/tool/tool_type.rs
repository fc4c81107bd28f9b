//! ToolType enum naming every AI-backed tool of the application.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Every independent AI-backed feature.
///
/// The serialized form is the `tool_type` slug persisted with history rows
/// and used to filter them when listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    #[serde(rename = "essay-corrector")]
    EssayCorrector,
    #[serde(rename = "image", alias = "image-generator")]
    ImageGenerator,
    #[serde(rename = "chat-pdf")]
    ChatPdf,
    #[serde(rename = "abnt")]
    Abnt,
    #[serde(rename = "spreadsheet")]
    Spreadsheet,
    #[serde(rename = "text-summary")]
    TextSummary,
    #[serde(rename = "video-summary")]
    VideoSummary,
    #[serde(rename = "translator")]
    Translator,
    #[serde(rename = "cover-letter")]
    CoverLetter,
    #[serde(rename = "social", alias = "social-media")]
    SocialMedia,
    #[serde(rename = "study")]
    StudyMaterial,
    #[serde(rename = "interview")]
    Interview,
    #[serde(rename = "image-prompt")]
    ImagePrompt,
    #[serde(rename = "veo3-prompt")]
    Veo3Prompt,
}

impl ToolType {
    /// Returns all tool types in menu order.
    pub fn all() -> &'static [ToolType] {
        &[
            ToolType::EssayCorrector,
            ToolType::ImageGenerator,
            ToolType::ChatPdf,
            ToolType::Abnt,
            ToolType::Spreadsheet,
            ToolType::TextSummary,
            ToolType::VideoSummary,
            ToolType::Translator,
            ToolType::CoverLetter,
            ToolType::SocialMedia,
            ToolType::StudyMaterial,
            ToolType::Interview,
            ToolType::ImagePrompt,
            ToolType::Veo3Prompt,
        ]
    }

    /// The persisted slug.
    pub fn slug(&self) -> &'static str {
        match self {
            ToolType::EssayCorrector => "essay-corrector",
            ToolType::ImageGenerator => "image",
            ToolType::ChatPdf => "chat-pdf",
            ToolType::Abnt => "abnt",
            ToolType::Spreadsheet => "spreadsheet",
            ToolType::TextSummary => "text-summary",
            ToolType::VideoSummary => "video-summary",
            ToolType::Translator => "translator",
            ToolType::CoverLetter => "cover-letter",
            ToolType::SocialMedia => "social",
            ToolType::StudyMaterial => "study",
            ToolType::Interview => "interview",
            ToolType::ImagePrompt => "image-prompt",
            ToolType::Veo3Prompt => "veo3-prompt",
        }
    }

    /// Returns the display name shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            ToolType::EssayCorrector => "Corretor de Redação",
            ToolType::ImageGenerator => "Gerador de Imagens",
            ToolType::ChatPdf => "Chat com PDF",
            ToolType::Abnt => "Formatador ABNT",
            ToolType::Spreadsheet => "Gerador de Planilhas",
            ToolType::TextSummary => "Resumidor de Textos",
            ToolType::VideoSummary => "Resumidor de Vídeos",
            ToolType::Translator => "Tradutor Corporativo",
            ToolType::CoverLetter => "Carta de Apresentação",
            ToolType::SocialMedia => "Gerador de Redes Sociais",
            ToolType::StudyMaterial => "Material de Estudo",
            ToolType::Interview => "Simulador de Entrevista",
            ToolType::ImagePrompt => "Gerador de Prompts de Imagem",
            ToolType::Veo3Prompt => "Gerador de Prompts Veo3",
        }
    }

    /// Credits the backend debits for one call of this tool.
    ///
    /// Enforcement is external; the value is only echoed into history
    /// metadata. Document questions are free, the upload that precedes
    /// them is not (see [`UPLOAD_CREDIT_COST`]).
    pub fn credit_cost(&self) -> u32 {
        match self {
            ToolType::ImageGenerator => 2,
            ToolType::ChatPdf => 0,
            _ => 1,
        }
    }
}

/// Credits debited for uploading a document before questioning it.
pub const UPLOAD_CREDIT_COST: u32 = 1;

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for ToolType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolType::all()
            .iter()
            .copied()
            .find(|t| t.slug() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("tool_type", format!("unknown tool '{}'", s))
            })
    }
}
