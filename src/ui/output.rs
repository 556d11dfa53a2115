use console::Style;

use rag_types::{Response, SubQuestionAnswer};

/// 命令行输出格式化工具
/// 状态信息走 stderr（Cargo 风格），回答走 stdout
pub struct Output {
    green: Style,
    bold: Style,
    dim: Style,
}

impl Output {
    pub fn new() -> Self {
        Self {
            green: Style::new().green().bold(),
            bold: Style::new().bold(),
            dim: Style::new().dim(),
        }
    }

    /// 显示状态消息
    /// 格式: "     Loading Programas/PP.pdf"（动词右对齐到 12 字符）
    pub fn status(&self, action: &str, target: &str) {
        eprintln!("{:>12} {}", self.green.apply_to(action), target);
    }

    /// 显示注意事项（右对齐）
    pub fn note(&self, message: &str) {
        eprintln!("{:>12} {}", self.dim.apply_to("Note"), message);
    }

    /// 显示警告（黄色，右对齐）
    pub fn warning(&self, message: &str) {
        eprintln!(
            "{:>12} {}",
            Style::new().yellow().bold().apply_to("Warning"),
            message
        );
    }

    /// 打印最终回答（标准输出，仅文本）
    pub fn answer(&self, response: &Response) {
        eprintln!();
        println!("{}", response);
    }

    /// 打印每个子问题及其工具回答
    /// 格式: "[1/2] programa_pp"
    ///       "      Q ..."
    ///       "      A ..."
    pub fn sub_answers(&self, answers: &[SubQuestionAnswer]) {
        if answers.is_empty() {
            self.note("no sub-questions were generated");
            return;
        }

        let total = answers.len();
        for (i, answer) in answers.iter().enumerate() {
            let index_part = format!("{}/{}", i + 1, total);
            println!();
            println!(
                "[{}] {}",
                self.dim.apply_to(&index_part),
                self.bold.apply_to(&answer.question.tool_name)
            );

            let indent = " ".repeat(index_part.len() + 3);
            println!("{}{} {}", indent, self.green.apply_to("Q"), answer.question.sub_question);
            let mut lines = answer.response.text.lines();
            if let Some(first) = lines.next() {
                println!("{}{} {}", indent, self.green.apply_to("A"), first);
            }
            for line in lines {
                println!("{}  {}", indent, line);
            }
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
