//! Prompt construction for the combined classify/tag/summarise call.

use crate::analysis::AnalyzeRequest;
use crate::category::Catalog;

/// Content beyond this many characters is cut before sending.
pub const MAX_CONTENT_CHARS: usize = 12_000;

/// Appended to content that was cut at `MAX_CONTENT_CHARS`.
pub const TRUNCATION_MARKER: &str = "\n...(内容已截断)";

/// System and user instructions for one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Builds prompts against a fixed catalog.
///
/// The system instruction depends only on the catalog, so it is rendered
/// once at construction and reused for every request.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system: String,
}

impl PromptBuilder {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            system: render_system(catalog),
        }
    }

    pub fn system_instruction(&self) -> &str {
        &self.system
    }

    /// Build the instruction pair for a request
    pub fn build(&self, request: &AnalyzeRequest) -> Prompt {
        Prompt {
            system: self.system.clone(),
            user: render_user(request),
        }
    }
}

fn render_system(catalog: &Catalog) -> String {
    let category_list = catalog
        .entries()
        .iter()
        .map(|c| format!("- \"{}\": {} / {}", c.slug, c.name_local, c.name_en))
        .collect::<Vec<_>>()
        .join("\n");
    let count = catalog.entries().len();

    format!(
        r#"你是一个文章分析助手。给定一篇文章的标题、正文、来源和作者，你需要完成以下任务：

1. **分类**：从以下 {count} 个类别中选择最合适的一个：
{category_list}

2. **标签**：提取 3-5 个关键标签（关键词），用于描述文章主题。

3. **摘要**：生成一段简洁的摘要（2-4 句话）。

4. **要点**：提取 3-5 个关键要点。

5. **语言检测**：判断文章主要语言，输出 "zh"（中文）或 "en"（英文）。

6. **置信度**：给出你对分类结果的置信度（0.0-1.0）。

**重要规则**：
- 摘要和标签的语言应跟随文章本身的语言（中文文章用中文，英文文章用英文）。
- category 必须是上述 {count} 个 slug 之一，不得自创。
- 直接输出 JSON，不要用 markdown code fence 包裹。

输出格式（严格 JSON）：
{{
  "category": "<slug>",
  "category_name": "<人类可读分类名>",
  "confidence": <0.0-1.0>,
  "tags": ["tag1", "tag2", "tag3"],
  "summary": "<摘要>",
  "key_points": ["要点1", "要点2", "要点3"],
  "language": "zh 或 en"
}}"#
    )
}

fn render_user(request: &AnalyzeRequest) -> String {
    let content = truncate_content(&request.content);

    format!(
        "请分析以下文章：\n\n标题：{}\n来源：{}\n作者：{}\n\n正文：\n{}",
        request.title, request.source, request.author, content
    )
}

/// Cut content to `MAX_CONTENT_CHARS` characters, marking the cut.
///
/// Counts chars rather than bytes so CJK text is never split mid-codepoint.
fn truncate_content(content: &str) -> String {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((cut, _)) => {
            let mut truncated = String::with_capacity(cut + TRUNCATION_MARKER.len());
            truncated.push_str(&content[..cut]);
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PromptBuilder {
        PromptBuilder::new(Catalog::builtin())
    }

    #[test]
    fn system_lists_every_category() {
        let builder = builder();
        let system = builder.system_instruction();
        for c in Catalog::builtin().entries() {
            let line = format!("- \"{}\": {} / {}", c.slug, c.name_local, c.name_en);
            assert!(system.contains(&line), "missing {}", line);
        }
        assert!(system.contains("从以下 9 个类别"));
    }

    #[test]
    fn system_names_every_output_field() {
        let builder = builder();
        let system = builder.system_instruction();
        for field in [
            "\"category\"",
            "\"category_name\"",
            "\"confidence\"",
            "\"tags\"",
            "\"summary\"",
            "\"key_points\"",
            "\"language\"",
        ] {
            assert!(system.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn user_interpolates_fields() {
        let req = AnalyzeRequest::new("Swift并发编程", "正文内容", "web", "Alice");
        let prompt = builder().build(&req);
        assert!(prompt.user.contains("标题：Swift并发编程"));
        assert!(prompt.user.contains("来源：web"));
        assert!(prompt.user.contains("作者：Alice"));
        assert!(prompt.user.ends_with("正文：\n正文内容"));
        assert!(!prompt.user.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn content_at_limit_is_untouched() {
        let content = "a".repeat(MAX_CONTENT_CHARS);
        assert_eq!(truncate_content(&content), content);
    }

    #[test]
    fn long_content_is_truncated_with_marker() {
        let content = "a".repeat(MAX_CONTENT_CHARS + 500);
        let truncated = truncate_content(&content);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        let body = truncated.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(body.chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        // 3 bytes per char; a byte-based cut would land mid-codepoint
        let content = "文".repeat(MAX_CONTENT_CHARS + 1);
        let truncated = truncate_content(&content);
        let body = truncated.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(body.chars().count(), MAX_CONTENT_CHARS);
        assert!(body.chars().all(|c| c == '文'));
    }

    #[test]
    fn build_is_deterministic() {
        let req = AnalyzeRequest::new("t", "c", "s", "a");
        assert_eq!(builder().build(&req), builder().build(&req));
    }
}
