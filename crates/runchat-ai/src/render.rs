//! Turns a finished thread message into displayable text and PNG images.

use std::io::Cursor;

use image::ImageFormat;
use tracing::warn;

use crate::run::{ContentBlock, ThreadMessage};
use crate::{AiError, AssistantApi};

/// Text and images of one assistant reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedReply {
    pub text: String,
    /// PNG-encoded images, in content order.
    pub images: Vec<Vec<u8>>,
}

/// Concatenate the text blocks of `message` and fetch its images.
///
/// An image that cannot be fetched or decoded is skipped; the rest of the
/// reply still renders.
pub async fn render_message(api: &dyn AssistantApi, message: &ThreadMessage) -> RenderedReply {
    let mut reply = RenderedReply::default();

    for block in &message.content {
        match block {
            ContentBlock::Text { text } => reply.text.push_str(&text.value),
            ContentBlock::ImageFile { image_file } => {
                match fetch_png(api, &image_file.file_id).await {
                    Ok(png) => reply.images.push(png),
                    Err(e) => {
                        warn!(file_id = %image_file.file_id, error = %e, "Skipping image")
                    }
                }
            }
            ContentBlock::Unsupported => {}
        }
    }

    reply
}

async fn fetch_png(api: &dyn AssistantApi, file_id: &str) -> Result<Vec<u8>, AiError> {
    let bytes = api.file_content(file_id).await?;
    reencode_png(&bytes)
}

/// Decode any supported image format and encode it as PNG.
pub(crate) fn reencode_png(bytes: &[u8]) -> Result<Vec<u8>, AiError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| AiError::ParseError(e.to_string()))?;
    let mut out = Cursor::new(Vec::new());
    decoded
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| AiError::ParseError(e.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{run_with_status, ScriptedApi};
    use image::{ImageBuffer, Rgb};

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn jpeg_bytes() -> Vec<u8> {
        let img = ImageBuffer::from_pixel(4, 3, Rgb([200u8, 30, 30]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    fn message(content: serde_json::Value) -> ThreadMessage {
        serde_json::from_value(serde_json::json!({
            "id": "msg_1",
            "role": "assistant",
            "content": content,
        }))
        .unwrap()
    }

    fn api() -> ScriptedApi {
        ScriptedApi::new(run_with_status("run_1", "completed"), vec![])
    }

    #[test]
    fn jpeg_is_reencoded_as_png() {
        let png = reencode_png(&jpeg_bytes()).unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
        let back = image::load_from_memory(&png).unwrap();
        assert_eq!((back.width(), back.height()), (4, 3));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            reencode_png(b"not an image"),
            Err(AiError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn text_blocks_concatenate_in_order() {
        let msg = message(serde_json::json!([
            { "type": "text", "text": { "value": "서울은 ", "annotations": [] } },
            { "type": "text", "text": { "value": "맑아요.", "annotations": [] } }
        ]));
        let reply = render_message(&api(), &msg).await;
        assert_eq!(reply.text, "서울은 맑아요.");
        assert!(reply.images.is_empty());
    }

    #[tokio::test]
    async fn image_blocks_are_fetched_and_converted() {
        let api = api().with_file("file_chart", jpeg_bytes());
        let msg = message(serde_json::json!([
            { "type": "image_file", "image_file": { "file_id": "file_chart" } },
            { "type": "text", "text": { "value": "chart above", "annotations": [] } }
        ]));
        let reply = render_message(&api, &msg).await;
        assert_eq!(reply.text, "chart above");
        assert_eq!(reply.images.len(), 1);
        assert!(reply.images[0].starts_with(PNG_SIGNATURE));
        assert_eq!(api.log(), vec!["file_content:file_chart"]);
    }

    #[tokio::test]
    async fn missing_or_broken_images_are_skipped() {
        let api = api().with_file("file_bad", b"%PDF".to_vec());
        let msg = message(serde_json::json!([
            { "type": "image_file", "image_file": { "file_id": "file_gone" } },
            { "type": "image_file", "image_file": { "file_id": "file_bad" } },
            { "type": "text", "text": { "value": "still here", "annotations": [] } }
        ]));
        let reply = render_message(&api, &msg).await;
        assert_eq!(reply.text, "still here");
        assert!(reply.images.is_empty());
    }

    #[tokio::test]
    async fn unsupported_blocks_are_ignored() {
        let msg = message(serde_json::json!([
            { "type": "image_url", "image_url": { "url": "https://x" } },
            { "type": "text", "text": { "value": "hi", "annotations": [] } }
        ]));
        let reply = render_message(&api(), &msg).await;
        assert_eq!(reply.text, "hi");
    }
}
