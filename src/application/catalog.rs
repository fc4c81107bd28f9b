//! ToolCatalog - One `ToolSpec` per tool of the application.
//!
//! Field names follow the backend contract so that most tools can use the
//! default payload (every text field plus `user_id`).

use serde_json::json;
use std::collections::HashMap;

use crate::config::LimitsConfig;
use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::history::HistoryDraft;
use crate::domain::tool::text::{char_count, preview, truncate_chars, word_count};
use crate::domain::tool::{ToolResult, ToolType, PREVIOUSLY_LOADED_LABEL};

use super::result_mappers as map;
use super::tool_spec::{ToolSpec, UploadStep};

pub const DEFAULT_ESSAY_THEME: &str = "Tema Livre";
pub const SPREADSHEET_HISTORY_OUTPUT: &str = "Arquivo Excel Gerado com Sucesso (.xlsx)";

/// Style descriptors appended to image prompts.
const IMAGE_STYLES: &[(&str, &str)] = &[
    ("realistic", "Fotorrealista, detalhado, 8K"),
    ("cinematic", "Cinematográfico, iluminação dramática, filme"),
    ("anime", "Anime, estilo japonês, cores vibrantes"),
    ("fantasy", "Arte de fantasia, mágico, épico"),
    ("cyberpunk", "Cyberpunk, neon, futurista"),
    ("painting", "Pintura a óleo, texturizado, artístico"),
];

/// Descriptor of an image style; unknown styles fall back to `realistic`.
pub fn image_style_descriptor(style: &str) -> &'static str {
    IMAGE_STYLES
        .iter()
        .find(|(key, _)| *key == style)
        .or_else(|| IMAGE_STYLES.first())
        .map(|(_, desc)| *desc)
        .unwrap_or_default()
}

/// Final prompt sent to the image model.
pub fn image_prompt(prompt: &str, style: &str) -> String {
    format!(
        "{}, {}, masterpiece, best quality",
        prompt,
        image_style_descriptor(style)
    )
}

/// Text stored as `output_data` for a result.
pub fn history_output(result: &ToolResult) -> String {
    match result {
        ToolResult::Text(text) | ToolResult::Url(text) => text.clone(),
        ToolResult::Score(score) if !score.body.is_null() => score.body.to_string(),
        ToolResult::Score(score) => serde_json::to_string(score).unwrap_or_default(),
        ToolResult::Structured(value) => value.to_string(),
        ToolResult::File(file) => file.file_name.clone(),
    }
}

/// All tools, keyed by type, plus the ABNT document export.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    specs: HashMap<ToolType, ToolSpec>,
    docx_export: ToolSpec,
}

impl ToolCatalog {
    pub fn new(limits: &LimitsConfig) -> Result<Self, ValidationError> {
        let specs = vec![
            essay_corrector(limits)?,
            image_generator()?,
            chat_pdf(limits)?,
            abnt()?,
            spreadsheet()?,
            text_summary()?,
            video_summary()?,
            translator()?,
            cover_letter()?,
            social_media()?,
            study_material()?,
            interview()?,
            image_prompt_generator()?,
            veo3_prompt()?,
        ];

        Ok(Self {
            specs: specs.into_iter().map(|s| (s.tool_type(), s)).collect(),
            docx_export: docx_export()?,
        })
    }

    pub fn get(&self, tool_type: ToolType) -> Option<&ToolSpec> {
        self.specs.get(&tool_type)
    }

    /// Converts formatted ABNT text to a DOCX file. Not recorded in history.
    pub fn docx_export(&self) -> &ToolSpec {
        &self.docx_export
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn essay_corrector(limits: &LimitsConfig) -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::EssayCorrector, "/correct-essay")
        .primary_field("essay")
        .require("essay")
        .min_chars("essay", limits.essay_min_chars)
        .default_value("theme", DEFAULT_ESSAY_THEME)
        .bind_replay("theme", "theme")
        .result(map::score())
        .history(|s, r| {
            let essay = s.text("essay");
            let theme = s.text("theme");
            let score = r.as_score().map(|sc| sc.total_score).unwrap_or_default();
            HistoryDraft::new(
                format!("Tema: {}\n\n{}", theme, preview(essay, 100)),
                history_output(r),
            )
            .with("theme", theme)
            .with("score", score)
            .with("word_count", word_count(essay))
        })
        .fallback_error("Erro ao corrigir redação.")
        .build()
}

fn image_generator() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::ImageGenerator, "/generate-image")
        .primary_field("prompt")
        .require("prompt")
        .default_value("style", "realistic")
        .bind_replay("style", "style")
        .payload(|s| {
            json!({
                "prompt": image_prompt(s.text("prompt"), s.text("style")),
                "user_id": s.user_id,
            })
        })
        .result(map::url_field("image_url"))
        .history(|s, r| {
            let url = history_output(r);
            HistoryDraft::new(image_prompt(s.text("prompt"), s.text("style")), url.clone())
                .with("style", s.text("style"))
                .with("image_url", url)
                .with("credits_used", ToolType::ImageGenerator.credit_cost())
        })
        .fallback_error("Erro ao gerar imagem.")
        .build()
}

fn chat_pdf(limits: &LimitsConfig) -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::ChatPdf, "/ask-document")
        .primary_field("question")
        .require("question")
        .upload(UploadStep {
            endpoint: "/upload-document".to_string(),
            file_field: "file".to_string(),
            fallback_error: "Erro ao ler o PDF.".to_string(),
            max_bytes: limits.max_upload_bytes,
        })
        .payload(|s| json!({"user_id": s.user_id, "question": s.text("question")}))
        .result(map::text_field(&["answer"]))
        .history(|s, r| {
            let label = s
                .document
                .map(|d| d.label().to_string())
                .unwrap_or_else(|| PREVIOUSLY_LOADED_LABEL.to_string());
            HistoryDraft::new(s.text("question"), history_output(r)).with("file_name", label)
        })
        .fallback_error("Erro ao gerar resposta.")
        .build()
}

fn abnt() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::Abnt, "/format-abnt")
        .primary_field("text")
        .require("text")
        .result(map::text_field(&["formatted_text"]))
        .history(|s, r| {
            let formatted = history_output(r);
            let formatted_length = char_count(&formatted);
            HistoryDraft::new(s.text("text"), formatted)
                .with("credits_used", ToolType::Abnt.credit_cost())
                .with("original_length", char_count(s.text("text")))
                .with("formatted_length", formatted_length)
        })
        .fallback_error("Erro ao formatar.")
        .build()
}

fn docx_export() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::Abnt, "/download-docx")
        .primary_field("markdown_text")
        .require("markdown_text")
        .payload(|s| json!({"markdown_text": s.text("markdown_text")}))
        .result(map::binary("Trabalho_ABNT.docx"))
        .fallback_error("Erro ao gerar o arquivo.")
        .build()
}

fn spreadsheet() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::Spreadsheet, "/generate-spreadsheet")
        .primary_field("prompt")
        .require("prompt")
        .result(map::binary("planilha_ia.xlsx"))
        .history(|s, _| {
            HistoryDraft::new(s.text("prompt"), SPREADSHEET_HISTORY_OUTPUT)
                .with("downloaded", true)
                .with("date", Timestamp::now().as_datetime().to_rfc3339())
        })
        .fallback_error("Erro ao gerar planilha.")
        .build()
}

fn text_summary() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::TextSummary, "/summarize-text")
        .primary_field("text")
        .require("text")
        .default_value("format", "bulletpoints")
        .bind_replay("format", "format")
        .result(map::text_field(&["summary"]))
        .history(|s, r| HistoryDraft::new(s.text("text"), history_output(r)).with("format", s.text("format")))
        .fallback_error("Erro ao resumir.")
        .build()
}

fn video_summary() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::VideoSummary, "/summarize-video")
        .primary_field("url")
        .require("url")
        .result(map::text_field(&["summary"]))
        .history(|s, r| HistoryDraft::new(s.text("url"), history_output(r)))
        .fallback_error("Erro ao resumir.")
        .build()
}

fn translator() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::Translator, "/corporate-translator")
        .primary_field("text")
        .require("text")
        .default_value("tone", "Profissional / Formal")
        .default_value("target_lang", "Português (Melhorar Texto)")
        .bind_replay("tone", "tone")
        .bind_replay("lang", "target_lang")
        .result(map::text_field(&["translated_text", "translation"]))
        .history(|s, r| {
            HistoryDraft::new(s.text("text"), history_output(r))
                .with("tone", s.text("tone"))
                .with("lang", s.text("target_lang"))
        })
        .fallback_error("Erro ao traduzir.")
        .build()
}

fn cover_letter() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::CoverLetter, "/generate-cover-letter")
        .primary_field("job_desc")
        .require("job_desc")
        .require("cv_text")
        .result(map::text_field(&["cover_letter"]))
        .history(|s, r| {
            HistoryDraft::new(s.text("job_desc"), history_output(r))
                .with("resume_preview", preview(s.text("cv_text"), 100))
        })
        .fallback_error("Erro ao gerar carta.")
        .build()
}

fn social_media() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::SocialMedia, "/generate-social-media")
        .primary_field("topic")
        .require("topic")
        .default_value("platform", "instagram")
        .default_value("tone", "professional")
        .bind_replay("platform", "platform")
        .bind_replay("tone", "tone")
        .result(map::text_field(&["content"]))
        .history(|s, r| {
            HistoryDraft::new(s.text("topic"), history_output(r))
                .with("platform", s.text("platform"))
                .with("tone", s.text("tone"))
        })
        .fallback_error("Erro ao gerar conteúdo.")
        .build()
}

fn study_material() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::StudyMaterial, "/generate-study-material")
        .primary_field("topic")
        .require("topic")
        .default_value("level", "ensino_medio")
        .bind_replay("level", "level")
        .result(map::text_field(&["material"]))
        .history(|s, r| HistoryDraft::new(s.text("topic"), history_output(r)).with("level", s.text("level")))
        .fallback_error("Erro ao gerar material.")
        .build()
}

fn interview() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::Interview, "/mock-interview")
        .primary_field("role")
        .require("role")
        .default_value("experience", "junior")
        .bind_replay("experience", "experience")
        .payload(|s| {
            json!({
                "role": s.text("role"),
                "company": s.text("company"),
                "description": s.text("description"),
                "experience": s.text("experience"),
                "user_id": s.user_id,
            })
        })
        .result(map::structured())
        .history(|s, r| {
            HistoryDraft::new(format!("{} na {}", s.text("role"), s.text("company")), history_output(r))
                .with("experience", s.text("experience"))
                .with("description_snippet", truncate_chars(s.text("description"), 50))
        })
        .fallback_error("Erro ao iniciar simulação.")
        .build()
}

fn image_prompt_generator() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::ImagePrompt, "/generate-prompt")
        .primary_field("idea")
        .require("idea")
        .default_value("style", "Cinematográfico (Padrão)")
        .bind_replay("style", "style")
        .result(map::text_field(&["prompt", "advanced_prompt"]))
        .history(|s, r| {
            let prompt = history_output(r);
            let length = char_count(&prompt);
            HistoryDraft::new(s.text("idea"), prompt)
                .with("length", length)
                .with("style", s.text("style"))
        })
        .fallback_error("Erro ao gerar prompt.")
        .build()
}

fn veo3_prompt() -> Result<ToolSpec, ValidationError> {
    ToolSpec::builder(ToolType::Veo3Prompt, "/generate-veo3-prompt")
        .primary_field("idea")
        .require("idea")
        .default_value("style", "Cinematográfico (Padrão)")
        .default_value("camera", "Cinematic Gimbal (Estável e Suave)")
        .bind_replay("style", "style")
        .bind_replay("camera", "camera")
        .result(map::text_field(&["prompt"]))
        .history(|s, r| {
            HistoryDraft::new(s.text("idea"), history_output(r))
                .with("style", s.text("style"))
                .with("camera", s.text("camera"))
        })
        .fallback_error("Erro ao gerar prompt.")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::tool::{DocumentPipeline, EssayScore, FileUpload, ToolRequest};
    use crate::application::tool_spec::Submission;
    use serde_json::Value;

    fn catalog() -> ToolCatalog {
        ToolCatalog::new(&LimitsConfig::default()).unwrap()
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn draft(tool: ToolType, request: ToolRequest, result: ToolResult) -> HistoryDraft {
        let catalog = catalog();
        let spec = catalog.get(tool).unwrap();
        let request = spec.prepare(request);
        let user = user();
        let submission = Submission {
            request: &request,
            user_id: &user,
            document: None,
        };
        spec.history_draft(&submission, &result).unwrap()
    }

    #[test]
    fn every_tool_has_a_spec() {
        let catalog = catalog();
        assert_eq!(catalog.len(), ToolType::all().len());
        for tool in ToolType::all() {
            assert_eq!(catalog.get(*tool).unwrap().tool_type(), *tool);
        }
    }

    #[test]
    fn docx_export_has_no_history() {
        let catalog = catalog();
        assert!(!catalog.docx_export().records_history());
        assert_eq!(catalog.docx_export().endpoint(), "/download-docx");
    }

    #[test]
    fn image_prompt_appends_style_descriptor() {
        assert_eq!(
            image_prompt("a cat", "anime"),
            "a cat, Anime, estilo japonês, cores vibrantes, masterpiece, best quality"
        );
        assert_eq!(image_style_descriptor("unknown"), "Fotorrealista, detalhado, 8K");
    }

    #[test]
    fn image_payload_carries_full_prompt_only() {
        let catalog = catalog();
        let spec = catalog.get(ToolType::ImageGenerator).unwrap();
        let request = spec.prepare(ToolRequest::new().with_text("prompt", "a cat"));
        let user = user();
        let payload = spec.payload(&Submission {
            request: &request,
            user_id: &user,
            document: None,
        });

        assert_eq!(
            payload,
            json!({
                "prompt": "a cat, Fotorrealista, detalhado, 8K, masterpiece, best quality",
                "user_id": "user-1"
            })
        );
    }

    #[test]
    fn essay_history_records_score_and_word_count() {
        let score = EssayScore {
            total_score: 780,
            feedback: "Bom".into(),
            ..Default::default()
        };
        let draft = draft(
            ToolType::EssayCorrector,
            ToolRequest::new().with_text("essay", "uma redação de cinco palavras"),
            ToolResult::Score(score),
        );

        assert_eq!(draft.input_data, "Tema: Tema Livre\n\numa redação de cinco palavras...");
        assert_eq!(draft.metadata["theme"], json!(DEFAULT_ESSAY_THEME));
        assert_eq!(draft.metadata["score"], json!(780));
        assert_eq!(draft.metadata["word_count"], json!(5));
        let stored: Value = serde_json::from_str(&draft.output_data).unwrap();
        assert_eq!(stored["total_score"], 780);
    }

    #[test]
    fn essay_history_stores_the_response_body_verbatim() {
        let body = json!({
            "total_score": 780.0,
            "feedback": null,
            "competencies": {"c1": 160},
            "sugestoes": ["Revise a conclusão"]
        });
        let score = EssayScore::from_body(body.clone()).unwrap();
        let draft = draft(
            ToolType::EssayCorrector,
            ToolRequest::new().with_text("essay", "uma redação de cinco palavras"),
            ToolResult::Score(score),
        );

        let stored: Value = serde_json::from_str(&draft.output_data).unwrap();
        assert_eq!(stored, body);
        assert_eq!(draft.metadata["score"], json!(780));
    }

    #[test]
    fn essay_requires_minimum_length() {
        let catalog = catalog();
        let spec = catalog.get(ToolType::EssayCorrector).unwrap();
        let request = spec.prepare(ToolRequest::new().with_text("essay", "curta"));
        assert!(matches!(
            spec.validate(&request),
            Err(ValidationError::TooShort { min: 50, .. })
        ));
    }

    #[test]
    fn translator_defaults_and_bindings() {
        let catalog = catalog();
        let spec = catalog.get(ToolType::Translator).unwrap();
        let request = spec.prepare(ToolRequest::new().with_text("text", "Oi"));

        assert_eq!(request.text("tone"), Some("Profissional / Formal"));
        assert_eq!(request.text("target_lang"), Some("Português (Melhorar Texto)"));
        assert!(spec.replay_bindings().contains(&("lang", "target_lang")));
    }

    #[test]
    fn cover_letter_uses_backend_field_names() {
        let catalog = catalog();
        let spec = catalog.get(ToolType::CoverLetter).unwrap();
        let request = ToolRequest::new()
            .with_text("job_desc", "Vaga de dev")
            .with_text("cv_text", "Meu currículo");
        let user = user();
        let payload = spec.payload(&Submission {
            request: &request,
            user_id: &user,
            document: None,
        });

        assert_eq!(
            payload,
            json!({"job_desc": "Vaga de dev", "cv_text": "Meu currículo", "user_id": "user-1"})
        );
    }

    #[test]
    fn chat_pdf_history_labels_uploaded_or_previous_document() {
        let catalog = catalog();
        let spec = catalog.get(ToolType::ChatPdf).unwrap();
        let request = ToolRequest::new().with_text("question", "Qual o tema?");
        let user = user();
        let answer = ToolResult::Text("Energia".into());

        let uploaded = DocumentPipeline::new(FileUpload::pdf("aula.pdf", vec![1]), 10)
            .unwrap()
            .complete_upload(None)
            .ready();
        let with_upload = spec
            .history_draft(
                &Submission {
                    request: &request,
                    user_id: &user,
                    document: Some(&uploaded),
                },
                &answer,
            )
            .unwrap();
        assert_eq!(with_upload.metadata["file_name"], json!("aula.pdf"));

        let previous = DocumentPipeline::previously_loaded();
        let without_upload = spec
            .history_draft(
                &Submission {
                    request: &request,
                    user_id: &user,
                    document: Some(&previous),
                },
                &answer,
            )
            .unwrap();
        assert_eq!(without_upload.metadata["file_name"], json!("Documento Carregado"));
    }

    #[test]
    fn interview_history_summarizes_role_and_company() {
        let draft = draft(
            ToolType::Interview,
            ToolRequest::new()
                .with_text("role", "Dev")
                .with_text("company", "Acme")
                .with_text("description", "x".repeat(80)),
            ToolResult::Structured(json!({"questions": []})),
        );

        assert_eq!(draft.input_data, "Dev na Acme");
        assert_eq!(draft.output_data, r#"{"questions":[]}"#);
        assert_eq!(draft.metadata["experience"], json!("junior"));
        assert_eq!(draft.metadata["description_snippet"], json!("x".repeat(50)));
    }

    #[test]
    fn spreadsheet_history_has_fixed_output() {
        let draft = draft(
            ToolType::Spreadsheet,
            ToolRequest::new().with_text("prompt", "controle de gastos"),
            ToolResult::File(crate::domain::tool::BinaryOutput {
                file_name: "planilha_ia.xlsx".into(),
                content_type: "application/octet-stream".into(),
                bytes: vec![1],
            }),
        );
        assert_eq!(draft.output_data, SPREADSHEET_HISTORY_OUTPUT);
        assert_eq!(draft.metadata["downloaded"], json!(true));
        assert!(draft.metadata["date"].is_string());
    }

    #[test]
    fn image_prompt_history_records_length() {
        let draft = draft(
            ToolType::ImagePrompt,
            ToolRequest::new().with_text("idea", "um dragão"),
            ToolResult::Text("dragão épico".into()),
        );
        assert_eq!(draft.metadata["length"], json!(12));
        assert_eq!(draft.metadata["style"], json!("Cinematográfico (Padrão)"));
    }
}
