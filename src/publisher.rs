//! Batch publishing: translate, render, deliver
//!
//! [`DocumentPublisher`] is the production [`BatchPublisher`]. A translation
//! failure for a single string keeps the source text; a render or delivery
//! failure aborts the publish and leaves the document on disk.

use async_trait::async_trait;
use std::sync::Arc;

use crate::crawler::BatchPublisher;
use crate::delivery::Channel;
use crate::error::Result;
use crate::models::{PublishReceipt, QuizBatch, QuizQuestion};
use crate::render::DocumentRenderer;
use crate::translate::Translator;

/// Publishes batches as translated documents to a delivery channel
pub struct DocumentPublisher {
    translator: Arc<dyn Translator>,
    renderer: DocumentRenderer<'static>,
    channel: Arc<dyn Channel>,
    target_language: String,
    keep_documents: bool,
}

impl DocumentPublisher {
    pub fn new(
        translator: Arc<dyn Translator>,
        renderer: DocumentRenderer<'static>,
        channel: Arc<dyn Channel>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            renderer,
            channel,
            target_language: target_language.into(),
            keep_documents: false,
        }
    }

    /// Keep rendered documents after a successful delivery
    pub fn keep_documents(mut self, keep: bool) -> Self {
        self.keep_documents = keep;
        self
    }

    async fn translate_or_keep(&self, text: &str) -> String {
        match self.translator.translate(text, &self.target_language).await {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!(error = %e, "Translation failed, keeping source text");
                text.to_string()
            }
        }
    }

    async fn translate_question(&self, question: &QuizQuestion) -> QuizQuestion {
        let question_text = self.translate_or_keep(&question.question_text).await;

        let mut options = Vec::with_capacity(question.options.len());
        for option in &question.options {
            options.push(self.translate_or_keep(option).await);
        }

        let explanation = self.translate_or_keep(&question.explanation).await;

        QuizQuestion {
            question_text,
            options,
            correct_index: question.correct_index,
            explanation,
        }
    }
}

#[async_trait]
impl BatchPublisher for DocumentPublisher {
    async fn publish(&self, batch: &QuizBatch) -> Result<PublishReceipt> {
        tracing::info!(
            questions = batch.len(),
            target = %self.target_language,
            "Translating batch"
        );

        let mut translated = Vec::with_capacity(batch.len());
        for question in &batch.questions {
            translated.push(self.translate_question(question).await);
        }

        let document = self
            .renderer
            .render(&translated, batch.start_index, &batch.source_url)?;
        let caption = self.renderer.caption(&document.title);

        let status = match self.channel.send_document(&document.path, &caption).await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %document.path.display(),
                    "Delivery failed, document kept on disk"
                );
                return Err(e.into());
            }
        };

        tracing::info!(%status, path = %document.path.display(), "Document delivered");

        if !self.keep_documents {
            if let Err(e) = tokio::fs::remove_file(&document.path).await {
                tracing::warn!(error = %e, path = %document.path.display(), "Failed to remove document");
            }
        }

        Ok(PublishReceipt {
            rendered: document.count,
            document: document.path,
            delivered: status.success,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::{ChannelError, ChannelResult, DeliveryStatus};
    use crate::translate::{PassthroughTranslator, TranslateError};
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingChannel {
        sent: Mutex<Vec<(PathBuf, String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl Channel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send_document(&self, path: &Path, caption: &str) -> ChannelResult<DeliveryStatus> {
            if self.fail {
                return Err(ChannelError::Rejected("chat not found".into()));
            }
            let content = std::fs::read_to_string(path)?;
            self.sent
                .lock()
                .unwrap()
                .push((path.to_path_buf(), caption.to_string(), content));
            Ok(DeliveryStatus::success(self.name()))
        }
    }

    struct UpperTranslator;

    #[async_trait]
    impl Translator for UpperTranslator {
        async fn translate(&self, text: &str, _lang: &str) -> std::result::Result<String, TranslateError> {
            if text.contains("fail") {
                return Err(TranslateError::Status(500));
            }
            Ok(text.to_uppercase())
        }
    }

    fn batch() -> QuizBatch {
        QuizBatch {
            questions: vec![QuizQuestion {
                question_text: "1. Which river? fail".into(),
                options: vec!["Ganga".into(), "Narmada".into()],
                correct_index: 1,
                explanation: "It flows west.".into(),
            }],
            start_index: 20,
            source_url: "https://example.com/quiz-october-18/".into(),
        }
    }

    fn publisher(dir: &TempDir, translator: Arc<dyn Translator>, channel: Arc<RecordingChannel>) -> DocumentPublisher {
        let renderer = DocumentRenderer::new(dir.path(), "gu").unwrap();
        DocumentPublisher::new(translator, renderer, channel, "gu")
    }

    #[tokio::test]
    async fn test_publish_translates_and_delivers() {
        let dir = TempDir::new().unwrap();
        let channel = Arc::new(RecordingChannel::default());
        let publisher = publisher(&dir, Arc::new(UpperTranslator), channel.clone());

        let receipt = publisher.publish(&batch()).await.unwrap();
        assert_eq!(receipt.rendered, 1);
        assert!(receipt.delivered);
        assert!(!receipt.document.exists(), "document removed after delivery");

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (_, caption, content) = &sent[0];
        assert_eq!(caption, "Quiz October 18 ગુજરાતીમાં");
        assert!(content.contains("NARMADA"));
        assert!(content.contains("IT FLOWS WEST."));
        // translation failure keeps the source text
        assert!(content.contains("1. Which river? fail"));
        assert!(content.contains("#21"));
    }

    #[tokio::test]
    async fn test_keep_documents() {
        let dir = TempDir::new().unwrap();
        let channel = Arc::new(RecordingChannel::default());
        let publisher =
            publisher(&dir, Arc::new(PassthroughTranslator), channel).keep_documents(true);

        let receipt = publisher.publish(&batch()).await.unwrap();
        assert!(receipt.document.exists());
    }

    #[tokio::test]
    async fn test_delivery_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let channel = Arc::new(RecordingChannel {
            fail: true,
            ..Default::default()
        });
        let publisher = publisher(&dir, Arc::new(PassthroughTranslator), channel);

        let err = publisher.publish(&batch()).await.unwrap_err();
        assert!(matches!(err, crate::error::Error::Channel(_)));

        let leftover = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftover, 1, "document kept for manual delivery");
    }
}
