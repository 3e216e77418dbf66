//! Markdown 导入
//! 使用 pulldown-cmark 的 Pull 模式把 Markdown 题库展平为纯文本，保留行结构供批量提取

use pulldown_cmark::{Event, Options, Parser, TagEnd};

/// Markdown 展平器
#[derive(Debug, Default)]
pub struct MarkdownFlattener {
    output: String,
}

impl MarkdownFlattener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flatten(&mut self, content: &str) -> String {
        self.output.clear();

        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);

        for event in Parser::new_ext(content, options) {
            self.process_event(event);
        }

        std::mem::take(&mut self.output).trim().to_string()
    }

    fn process_event(&mut self, event: Event) {
        match event {
            Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Item)
            | Event::End(TagEnd::List(_))
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::CodeBlock)
            | Event::End(TagEnd::TableRow)
            | Event::End(TagEnd::TableHead) => {
                self.end_line();
            }
            Event::End(TagEnd::TableCell) => {
                self.output.push(' ');
            }
            Event::Text(text) | Event::Code(text) => {
                self.output.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak => {
                self.output.push('\n');
            }
            Event::Rule => {
                self.end_line();
            }
            _ => {}
        }
    }

    fn end_line(&mut self) {
        if !self.output.is_empty() && !self.output.ends_with('\n') {
            self.output.push('\n');
        }
    }
}

/// 使用默认设置展平 Markdown
pub fn flatten_markdown(content: &str) -> String {
    MarkdownFlattener::new().flatten(content)
}
