use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::flow::constants::{llm, prompt, system_prompt};
use crate::flow::{FlowEngine, FlowSpec};
use crate::llm::ModelConfig;
use crate::prompt::{FlowInput, PromptWriter};
use crate::schema::Schema;

pub const NAME: &str = "portfolio-website";

pub const THEMES: [&str; 3] = ["Minimal", "Modern", "Creative"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProject {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInput {
    pub full_name: String,
    pub headline: String,
    pub about: String,
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<PortfolioProject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    pub theme: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioOutput {
    pub html: String,
    pub css: String,
    pub suggestions: Vec<String>,
}

pub fn input_schema() -> Schema {
    let project = Schema::object()
        .field("name", Schema::string().non_empty())
        .field("description", Schema::string().non_empty())
        .field("link", Schema::string().optional());
    Schema::object()
        .field("fullName", Schema::string().non_empty().max_length(120))
        .field("headline", Schema::string().non_empty().max_length(200))
        .field("about", Schema::string().non_empty())
        .field("skills", Schema::array(Schema::string().non_empty()))
        .field("projects", Schema::array(project).optional())
        .field("contactEmail", Schema::string().optional())
        .field("theme", Schema::enumeration(THEMES))
}

pub fn output_schema() -> Schema {
    Schema::object()
        .field(
            "html",
            Schema::string()
                .non_empty()
                .with_description("Body markup only; the stylesheet is returned separately."),
        )
        .field("css", Schema::string().non_empty())
        .field("suggestions", Schema::array(Schema::string()))
}

fn theme_guidance(theme: &str) -> &'static str {
    match theme {
        "Minimal" => "Use generous whitespace, a single accent colour and system fonts.",
        "Creative" => "Use bold colours, playful layout and subtle CSS animations.",
        _ => "Use a clean grid, card-based project tiles and a contemporary sans-serif font.",
    }
}

fn template(input: &FlowInput<'_>) -> String {
    let theme = input.text("theme");
    let mut w = PromptWriter::new();
    w.line("Build a single-page personal portfolio website.")
        .blank()
        .field("Name", input.text("fullName"))
        .field("Headline", input.text("headline"))
        .block("About", input.text("about"))
        .bullets("Skills", &input.list("skills"));

    let projects = input.items("projects");
    if !projects.is_empty() {
        w.line("Projects:");
        for project in projects {
            let project = FlowInput::new(project);
            match project.optional_text("link") {
                Some(link) => w.line(format!(
                    "- {}: {} ({link})",
                    project.text("name"),
                    project.text("description")
                )),
                None => w.line(format!(
                    "- {}: {}",
                    project.text("name"),
                    project.text("description")
                )),
            };
        }
    }

    w.optional_field("Contact Email", input.optional_text("contactEmail"))
        .blank()
        .field("Theme", theme)
        .line(theme_guidance(theme))
        .line("Return semantic, responsive HTML in `html` without <style> tags.")
        .line("Put the stylesheet in `css` and a few content suggestions in `suggestions`.");
    w.finish()
}

pub fn spec() -> FlowSpec {
    FlowSpec::new(NAME, "Portfolio Website", input_schema(), output_schema(), template)
        .with_description("Generates HTML and CSS for a personal portfolio page.")
        .with_system(system_prompt(prompt::WEB_DESIGNER))
        .with_model(ModelConfig::default().with_temperature(llm::CREATIVE_TEMPERATURE))
}

pub async fn generate_portfolio(
    engine: &FlowEngine,
    input: &PortfolioInput,
) -> Result<PortfolioOutput> {
    engine.execute_typed(NAME, input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "fullName": "Ada Lovelace",
            "headline": "Analytical engine programmer",
            "about": "I write algorithms.",
            "skills": ["Mathematics", "Poetry"],
            "theme": "Minimal"
        })
    }

    #[test]
    fn projects_section_is_skipped_when_empty() {
        let prompt = spec().render(&sample()).user;
        assert!(!prompt.contains("Projects:"));
        assert!(prompt.contains("- Poetry"));
        assert!(prompt.contains("generous whitespace"));
    }

    #[test]
    fn project_links_are_inlined() {
        let mut value = sample();
        value["projects"] = json!([
            {"name": "Notes", "description": "Bernoulli numbers", "link": "https://example.org"},
            {"name": "Letters", "description": "Correspondence"}
        ]);
        let prompt = spec().render(&value).user;
        assert!(prompt.contains("- Notes: Bernoulli numbers (https://example.org)"));
        assert!(prompt.contains("- Letters: Correspondence\n"));
    }

    #[test]
    fn theme_must_be_known() {
        let mut value = sample();
        value["theme"] = json!("Brutalist");
        assert!(spec().validate_input(&value).is_err());
    }
}
