use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;

pub fn get_styles() -> Styles {
    clap::builder::Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .literal(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

pub mod colors {
    use crossterm::style::Color;

    pub const CYAN: Color = Color::Cyan;
    pub const GREEN: Color = Color::Green;
    pub const ORANGE: Color = Color::DarkYellow;
    pub const RED: Color = Color::Red;
    pub const DIM: Color = Color::DarkGrey;
    pub const WHITE: Color = Color::White;
}

pub fn print_success(message: &str) {
    println!(" {} {}", "✓".with(colors::GREEN).bold(), message.with(colors::GREEN));
}

pub fn print_error(message: &str) {
    println!(" {} {}", "✗".with(colors::RED).bold(), message.with(colors::RED));
}

pub fn print_warning(message: &str) {
    println!(" {} {}", "⚠".with(colors::ORANGE).bold(), message.with(colors::ORANGE));
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        "●".with(colors::CYAN),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

pub fn print_welcome(db_path: &str, storage_dir: &str, song_count: usize) {
    println!();
    println!("{}", "SongStorage".with(colors::CYAN).bold());
    print_key_value("Database", db_path);
    print_key_value("Content store", storage_dir);
    print_key_value("Songs", &song_count.to_string());
    println!(
        "{}",
        "  Type 'help' for available commands".with(colors::DIM)
    );
    println!();
}

/// Plain box-drawing table for search results.
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        TableBuilder {
            headers: headers.into_iter().map(String::from).collect(),
            rows: Vec::new(),
            col_widths,
        }
    }

    pub fn add_row(&mut self, row: Vec<&str>) {
        for (i, cell) in row.iter().enumerate() {
            if i < self.col_widths.len() {
                self.col_widths[i] = self.col_widths[i].max(cell.width());
            }
        }
        self.rows.push(row.into_iter().map(String::from).collect());
    }

    pub fn print(&self) {
        self.print_separator("┌", "┬", "┐");

        print!("│");
        for (i, header) in self.headers.iter().enumerate() {
            let padding = self.col_widths[i] - header.width();
            print!(" {}{} │", header.clone().with(colors::CYAN).bold(), " ".repeat(padding));
        }
        println!();

        self.print_separator("├", "┼", "┤");

        for row in &self.rows {
            print!("│");
            for (i, cell) in row.iter().enumerate() {
                let width = self.col_widths.get(i).unwrap_or(&0);
                let padding = width.saturating_sub(cell.width());
                print!(" {}{} │", cell, " ".repeat(padding));
            }
            println!();
        }

        self.print_separator("└", "┴", "┘");
    }

    fn print_separator(&self, left: &str, mid: &str, right: &str) {
        print!("{}", left);
        for (i, width) in self.col_widths.iter().enumerate() {
            print!("{}", "─".repeat(width + 2));
            if i < self.col_widths.len() - 1 {
                print!("{}", mid);
            }
        }
        println!("{}", right);
    }
}
