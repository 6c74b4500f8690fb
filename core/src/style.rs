use std::collections::BTreeMap;
use std::path::Path;

use colored::{Color, ColoredString, Colorize};
use crossterm::terminal;

use crate::testing::{JudgeCode, TestReport};

#[macro_export]
macro_rules! print_success {
    ($fmt:literal, $($e:tt)*) => {
        use ::colored::Colorize as _;
        println!("{}", format!($fmt, $($e)*).green())
    }
}

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false;
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for log::Level {
    fn color(&self) -> Color {
        use log::Level::*;
        match self {
            Error => Color::BrightRed,
            Warn => Color::BrightYellow,
            Info => Color::Cyan,
            Debug => Color::Magenta,
            Trace => Color::Blue,
        }
    }
}

impl ColorTheme for JudgeCode {
    fn color(&self) -> Color {
        use JudgeCode::*;
        if !self::is_truecolor_supported() {
            return match self {
                Accepted => Color::Green,
                WrongAnswer | Unaccepted => Color::Yellow,
                TimeLimitExceeded | CpuTimeLimitExceeded | SpaceLimitExceeded => Color::Red,
                RuntimeError => Color::Magenta,
                CompilationError => Color::Blue,
                SystemError => Color::BrightBlack,
            };
        }

        let (r, g, b) = match self {
            Accepted => (30, 180, 40),
            WrongAnswer | Unaccepted => (210, 138, 4),
            TimeLimitExceeded | CpuTimeLimitExceeded => (220, 42, 42),
            SpaceLimitExceeded => (200, 60, 110),
            RuntimeError => (171, 40, 200),
            CompilationError => (40, 100, 210),
            SystemError => (110, 110, 110),
        };
        Color::TrueColor { r, g, b }
    }
}

pub fn judge_icon(judge: JudgeCode) -> ColoredString {
    let fg = if is_truecolor_supported() {
        Color::TrueColor {
            r: 255,
            g: 255,
            b: 255,
        }
    } else {
        Color::BrightWhite
    };
    format!(" {} ", judge.abbr())
        .on_color(judge.color())
        .bold()
        .color(fg)
}

/// `----- a.yml: All 3 tests passed ✨ -----` or a per-verdict breakdown on failure.
pub fn print_report_summary(problem: &Path, report: &TestReport) {
    let bar = "-".repeat(5);
    let label = crate::short_path(problem).display().to_string().bold();

    if report.children.is_none() {
        println!(
            "{} {}: {} {}",
            bar,
            label,
            self::judge_icon(report.result),
            bar
        );
        return;
    }

    let total = report.children().len();
    let passed = report.num_accepted_children();

    if report.is_accepted() {
        let msg = format!("All {} tests passed ✨", total);
        println!("{} {}: {} {}", bar, label, msg.green(), bar);
        return;
    }

    let mut count: BTreeMap<i32, (JudgeCode, usize)> = BTreeMap::new();
    for child in report.children().iter().filter(|c| !c.is_accepted()) {
        count.entry(child.result.ordinal()).or_insert((child.result, 0)).1 += 1;
    }
    let detail = count
        .values()
        .map(|&(judge, cnt)| {
            format!(
                "{}{}{}",
                self::judge_icon(judge),
                "x".dimmed(),
                cnt.to_string().bold().bright_white(),
            )
        })
        .collect::<Vec<String>>()
        .join(", ");
    let summary = if passed > 0 {
        format!("{}/{} tests failed 💣", total - passed, total)
    } else {
        format!("All {} tests failed 💀", total)
    };
    println!(
        "{} {}: {} ({}) {}",
        bar,
        label,
        summary.bright_red(),
        detail,
        bar
    );
}

/// Box every failing case (or the top-level failure) with its message.
pub fn print_report_detail(report: &TestReport) {
    let (cols, _) = terminal::size().unwrap_or((40, 40));
    let cols = cols as usize;

    const BOLD_LINE: &str = "━";
    let bold_bar = BOLD_LINE.repeat(cols).blue().bold();

    if report.children.is_none() {
        if let Some(msg) = &report.message {
            println!("{}\n{}\n{}", bold_bar, msg.trim_end(), bold_bar);
        }
        return;
    }

    for (i, child) in report.children().iter().enumerate() {
        if child.is_accepted() {
            continue;
        }
        let usage = match (child.used_time, child.used_space) {
            (Some(t), Some(s)) => format!(" [{}ms, {}KB]", t, s / 1024),
            (Some(t), None) => format!(" [{}ms]", t),
            _ => String::new(),
        };
        println!(
            "\n{}: {}{}\n{}",
            format!("test #{}", i).color(Color::BrightYellow).bold(),
            self::judge_icon(child.result),
            usage,
            bold_bar,
        );
        match &child.message {
            Some(msg) => println!("{}", msg.trim_end()),
            None => println!("{}", "<NO MESSAGE>".magenta().dimmed()),
        }
        println!("{}", bold_bar);
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn every_verdict_has_a_badge() {
        for code in JudgeCode::iter() {
            let icon = judge_icon(code);
            assert!(icon.contains(code.abbr()), "{:?}", code);
        }
    }
}
