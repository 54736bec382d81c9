//! Quick-start content request templates

use std::fmt;

/// Built-in request starters
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TemplateKind {
    Tweet,
    Instagram,
    #[value(name = "linkedin")]
    LinkedIn,
    #[value(name = "blog-idea")]
    BlogIdea,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::Tweet,
        TemplateKind::Instagram,
        TemplateKind::LinkedIn,
        TemplateKind::BlogIdea,
    ];

    /// Button-style label
    pub fn label(self) -> &'static str {
        match self {
            TemplateKind::Tweet => "Tweet",
            TemplateKind::Instagram => "Instagram Post",
            TemplateKind::LinkedIn => "LinkedIn Post",
            TemplateKind::BlogIdea => "Blog Post Idea",
        }
    }

    /// The content request this template fills in
    pub fn request(self) -> &'static str {
        match self {
            TemplateKind::Tweet => "Write a short, engaging tweet about...",
            TemplateKind::Instagram => "Write a captivating Instagram caption for...",
            TemplateKind::LinkedIn => "Write a professional LinkedIn post about...",
            TemplateKind::BlogIdea => "Generate three blog post ideas about...",
        }
    }

    /// The template request with `topic` substituted for the trailing ellipsis
    pub fn with_topic(self, topic: &str) -> String {
        let base = self.request().trim_end_matches("...");
        format!("{} {}", base, topic.trim())
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
