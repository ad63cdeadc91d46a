use rozklad::{CityMention, Role, TurnReport};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_turn(report: &TurnReport, color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{} {}",
        palette.bold(palette.paint(format!("⚙  Turn: \"{}\"", report.message), ansi::CYAN)),
        palette.dim(format!("[session {}]", report.session_id))
    );

    println!("\n{}", palette.paint("━━━ Analysis ━━━", ansi::GRAY));
    print_analysis(report, &palette);

    println!("\n{}", palette.paint("━━━ Dialogue ━━━", ansi::GRAY));
    print_dialogue(report, &palette);

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    let m = &report.metrics;
    println!(
        "  Total: {}  │  Analyze: {}  │  Lock: {}  │  Step: {}  │  Fallback: {}  │  Render: {}",
        palette.paint(format!("{:?}", m.total), ansi::GREEN),
        palette.paint(format!("{:?}", m.analyze), ansi::CYAN),
        palette.dim(format!("{:?}", m.lock_wait)),
        palette.paint(format!("{:?}", m.transition), ansi::CYAN),
        palette.dim(format!("{:?}", m.fallback)),
        palette.dim(format!("{:?}", m.render)),
    );
    println!();
}

fn print_analysis(report: &TurnReport, palette: &ansi::Palette) {
    let analysis = &report.analysis;
    println!("  {} {}", palette.dim("normalized:"), palette.paint(&analysis.normalized, ansi::BLUE));
    println!("  {} {}", palette.dim("tokens:"), palette.dim(analysis.tokens.join(" · ")));

    if analysis.mentions.is_empty() {
        println!("  {}", palette.dim("No cities recognized"));
    } else {
        for (idx, mention) in analysis.mentions.iter().enumerate() {
            println!("  {} {}", palette.paint(format!("[{idx}]"), ansi::GRAY), fmt_mention(mention, palette));
        }
    }

    let confirmation = match analysis.confirmation {
        Some(c) => palette.paint(format!("{c:?}"), ansi::YELLOW),
        None => palette.dim("none"),
    };
    let faq = match analysis.intent {
        Some(name) => palette.paint(name, ansi::YELLOW),
        None => palette.dim("none"),
    };
    println!("  {} {}  {} {}", palette.dim("confirmation:"), confirmation, palette.dim("│ faq:"), faq);
}

fn print_dialogue(report: &TurnReport, palette: &ansi::Palette) {
    let changed = report.state_before != report.state_after;
    let after = report.state_after.to_string();
    println!(
        "  {} {} {}",
        palette.paint(report.state_before.to_string(), ansi::BLUE),
        palette.dim("→"),
        if changed { palette.bold(palette.paint(after, ansi::GREEN)) } else { palette.paint(after, ansi::BLUE) }
    );

    let pair = match report.intent.pair() {
        Some(pair) => palette.paint(format!("{} → {}", pair.origin, pair.destination), ansi::YELLOW),
        None => String::new(),
    };
    println!("  {} {} {}", palette.dim("reply:"), palette.paint(report.intent.name(), ansi::CYAN), pair);

    if let Some(confirm) = &report.response.confirm {
        println!("  {} {} → {}", palette.dim("confirm buttons:"), confirm.start, confirm.end);
    }
}

fn fmt_mention(mention: &CityMention, palette: &ansi::Palette) -> String {
    let role = match mention.role {
        Role::Origin => "origin",
        Role::Destination => "destination",
        Role::Unknown => "unknown",
    };
    let score = if mention.exact {
        palette.paint("exact", ansi::GREEN)
    } else {
        palette.paint(format!("fuzzy {}", mention.score), ansi::YELLOW)
    };
    format!(
        "{} {} {} {} {}",
        palette.bold(palette.paint(&mention.city, ansi::GREEN)),
        palette.dim("│"),
        palette.paint(role, ansi::BLUE),
        palette.dim(format!("@{}", mention.position)),
        score
    )
}
