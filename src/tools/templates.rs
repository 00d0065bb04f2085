//! Tools for browsing and cloning habit templates
//!
//! This module implements the habit_templates and habit_from_template MCP
//! tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{find_template, templates_in, CategoryInfo, Habit, HabitTemplate, TemplateCategory};
use crate::storage::HabitStorage;
use crate::tools::{parse_color, parse_frequency, CreateHabitResponse, HabitSummary, ToolContext, ToolError};

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct TemplatesParams {
    /// health, productivity, mindfulness, learning, fitness, social or creative
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub categories: Vec<CategoryInfo>,
    pub templates: Vec<&'static HabitTemplate>,
}

/// List template categories and the templates in them
pub fn list_templates(params: TemplatesParams) -> Result<TemplatesResponse, ToolError> {
    let category = params
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(TemplateCategory::parse)
        .transpose()?;

    Ok(TemplatesResponse {
        categories: TemplateCategory::ALL.iter().map(|c| c.info()).collect(),
        templates: templates_in(category),
    })
}

/// Parameters for cloning a template; any field given overrides the template's
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct FromTemplateParams {
    pub template_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub frequency: Option<String>,
    pub target_per_week: Option<u8>,
}

/// Create a habit for the caller from a template
pub fn create_from_template<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: FromTemplateParams,
) -> Result<CreateHabitResponse, ToolError> {
    let template = find_template(&params.template_id)
        .ok_or_else(|| ToolError::NotFound(format!("Template '{}' not found", params.template_id)))?;

    let mut details = template.details();
    if let Some(name) = params.name.filter(|n| !n.trim().is_empty()) {
        details.name = name;
    }
    if let Some(description) = params.description.filter(|d| !d.trim().is_empty()) {
        details.description = description;
    }
    if let Some(color) = parse_color(params.color.as_deref())? {
        details.color = color;
    }
    if let Some(frequency) = parse_frequency(params.frequency.as_deref())? {
        details.frequency = frequency;
    }
    if let Some(target) = params.target_per_week {
        details.target_per_week = target;
    }

    let habit = Habit::new(ctx.user_id.clone(), details, ctx.calendar.now())?;
    storage.create_habit(&habit)?;
    info!("Created habit '{}' ({}) from template {}", habit.name, habit.id, template.id);

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: "Habit created from template".to_string(),
        habit: HabitSummary::new(&habit, ctx.today()),
    })
}
