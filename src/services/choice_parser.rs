//! 选项解析器
//! 单遍扫描题目文本，定位 "A." / "B)" 形式的选项标记，切分出题干与选项

use crate::models::{ParsedChoice, ParsedQuestion, QuestionRecord};

/// 选项标记在文本中的位置
#[derive(Debug, Clone, Copy)]
struct ChoiceMarker {
    letter: char,
    /// 标记字母所在的字节偏移
    start: usize,
    /// 选项正文起始的字节偏移
    body_start: usize,
}

fn is_choice_letter(c: char) -> bool {
    ('A'..='J').contains(&c)
}

/// 找出所有不重叠的选项标记：字母 A-J，前面是文本开头或空白，后接 `.` 或 `)` 再接空白
fn scan_markers(text: &str) -> Vec<ChoiceMarker> {
    let mut markers = Vec::new();
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        let at_boundary = prev.map_or(true, char::is_whitespace);

        if at_boundary && is_choice_letter(c) {
            let rest = &text[pos + c.len_utf8()..];
            let mut tail = rest.chars();
            if let (Some(delim @ ('.' | ')')), Some(ws)) = (tail.next(), tail.next()) {
                if ws.is_whitespace() {
                    let body_start = pos + c.len_utf8() + delim.len_utf8() + ws.len_utf8();
                    markers.push(ChoiceMarker { letter: c, start: pos, body_start });

                    // 跳过分隔符与空白，保证标记不重叠
                    while chars.peek().map_or(false, |&(i, _)| i < body_start) {
                        chars.next();
                    }
                    prev = Some(ws);
                    continue;
                }
            }
        }

        prev = Some(c);
    }

    markers
}

/// 压缩连续空白为单个空格并去除首尾空白
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 解析题目文本为题干 + 选项
///
/// 选项按字母排序而非出现位置；同一字母只保留第一次出现。
/// 题干为最早出现的标记之前的全部文本。
pub fn parse_choices(text: &str) -> ParsedQuestion {
    let markers = scan_markers(text);

    let Some(first) = markers.first() else {
        return ParsedQuestion {
            stem: collapse_whitespace(text),
            choices: Vec::new(),
        };
    };

    let stem = collapse_whitespace(&text[..first.start]);

    let mut choices: Vec<ParsedChoice> = Vec::with_capacity(markers.len());
    for (i, marker) in markers.iter().enumerate() {
        if choices.iter().any(|c| c.letter == marker.letter) {
            continue;
        }
        let body_end = markers.get(i + 1).map_or(text.len(), |next| next.start);
        choices.push(ParsedChoice {
            letter: marker.letter,
            text: collapse_whitespace(&text[marker.body_start..body_end]),
        });
    }
    choices.sort_by_key(|c| c.letter);

    ParsedQuestion { stem, choices }
}

/// 简答题回退：没有选项时展示的答案文本
pub fn display_answer(record: &QuestionRecord) -> Option<String> {
    let parsed = parse_choices(&record.question_text);
    if parsed.is_free_response() {
        Some(record.correct_answer.clone())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiline_choices() {
        let text = "What is 2 + 2?\nA. 3\nB. 4\nC. 5\nD. 6";
        let parsed = parse_choices(text);

        assert_eq!(parsed.stem, "What is 2 + 2?");
        assert_eq!(parsed.choices.len(), 4);
        assert_eq!(parsed.choices[1], ParsedChoice { letter: 'B', text: "4".to_string() });
    }

    #[test]
    fn test_parse_inline_run() {
        let parsed = parse_choices("Pick one: A) red B) green C) blue");

        assert_eq!(parsed.stem, "Pick one:");
        let letters: Vec<char> = parsed.choices.iter().map(|c| c.letter).collect();
        assert_eq!(letters, vec!['A', 'B', 'C']);
        assert_eq!(parsed.choices[2].text, "blue");
    }

    #[test]
    fn test_choices_sorted_by_letter() {
        let parsed = parse_choices("B. foo A. bar");

        assert_eq!(parsed.stem, "");
        assert_eq!(parsed.choices[0], ParsedChoice { letter: 'A', text: "bar".to_string() });
        assert_eq!(parsed.choices[1], ParsedChoice { letter: 'B', text: "foo".to_string() });
    }

    #[test]
    fn test_choice_body_spans_lines() {
        let text = "Which is true?\nA. The first option\n   continues here\nB.   second";
        let parsed = parse_choices(text);

        assert_eq!(parsed.choices[0].text, "The first option continues here");
        assert_eq!(parsed.choices[1].text, "second");
    }

    #[test]
    fn test_duplicate_letter_keeps_first() {
        let parsed = parse_choices("Q?\nA. one\nB. two\nA. again");

        assert_eq!(parsed.choices.len(), 2);
        assert_eq!(parsed.choices[0].text, "one");
        // 重复标记仍然截断前一个选项
        assert_eq!(parsed.choices[1].text, "two");
    }

    #[test]
    fn test_free_response_has_no_choices() {
        let parsed = parse_choices("  Define   osmosis.\n ");

        assert!(parsed.is_free_response());
        assert_eq!(parsed.stem, "Define osmosis.");
    }

    #[test]
    fn test_marker_requires_boundary_and_whitespace() {
        // "pH." 中的 H 前面不是空白；"A.B" 后面没有空白
        let parsed = parse_choices("Measure the pH. then A.B testing");
        assert!(parsed.choices.is_empty());

        // 小写字母与 J 之后的字母都不是标记
        let parsed = parse_choices("a. lower K. out of range");
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn test_letters_up_to_j() {
        let text = "Q\nA. a\nB. b\nC. c\nD. d\nE. e\nF. f\nG. g\nH. h\nI. i\nJ. j";
        let parsed = parse_choices(text);
        assert_eq!(parsed.choices.len(), 10);
        assert_eq!(parsed.choices[9].letter, 'J');
    }

    #[test]
    fn test_parse_is_idempotent() {
        let text = "Which are primary colors?\nA. Red\nB. Green\nC. Blue\nD. Yellow";
        assert_eq!(parse_choices(text), parse_choices(text));
    }

    #[test]
    fn test_display_answer_fallback() {
        let free = QuestionRecord::new("Capital of France?", "Paris");
        assert_eq!(display_answer(&free), Some("Paris".to_string()));

        let mc = QuestionRecord::new("2 + 2?\nA. 3\nB. 4", "B");
        assert_eq!(display_answer(&mc), None);
    }
}
