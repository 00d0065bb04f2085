//! Built-in habit templates
//!
//! A fixed catalogue of common habits grouped into categories. Templates are
//! read-only; cloning one produces an ordinary [`Habit`](crate::domain::Habit).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Frequency, HabitColor, HabitDetails};

/// Grouping used when browsing templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Health,
    Productivity,
    Mindfulness,
    Learning,
    Fitness,
    Social,
    Creative,
}

/// Display information for a category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub id: TemplateCategory,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: HabitColor,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 7] = [
        TemplateCategory::Health,
        TemplateCategory::Productivity,
        TemplateCategory::Mindfulness,
        TemplateCategory::Learning,
        TemplateCategory::Fitness,
        TemplateCategory::Social,
        TemplateCategory::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Health => "health",
            TemplateCategory::Productivity => "productivity",
            TemplateCategory::Mindfulness => "mindfulness",
            TemplateCategory::Learning => "learning",
            TemplateCategory::Fitness => "fitness",
            TemplateCategory::Social => "social",
            TemplateCategory::Creative => "creative",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let normalized = value.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| DomainError::InvalidValue {
                message: format!(
                    "Unknown template category '{}'. Valid options: {}",
                    value,
                    Self::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
                ),
            })
    }

    pub fn info(&self) -> CategoryInfo {
        let (name, icon, color) = match self {
            TemplateCategory::Health => ("Health", "favorite", HabitColor::Red),
            TemplateCategory::Productivity => ("Productivity", "bolt", HabitColor::Amber),
            TemplateCategory::Mindfulness => ("Mindfulness", "self_improvement", HabitColor::Violet),
            TemplateCategory::Learning => ("Learning", "school", HabitColor::Blue),
            TemplateCategory::Fitness => ("Fitness", "fitness_center", HabitColor::Teal),
            TemplateCategory::Social => ("Social", "groups", HabitColor::Pink),
            TemplateCategory::Creative => ("Creative", "palette", HabitColor::Orange),
        };
        CategoryInfo {
            id: *self,
            name,
            icon,
            color,
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A predefined habit users can clone
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitTemplate {
    pub id: &'static str,
    pub category: TemplateCategory,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub default_color: HabitColor,
    pub frequency: Frequency,
    pub target_per_week: u8,
    pub difficulty: Difficulty,
    pub estimated_minutes: u16,
    /// Position within its category
    pub order: u8,
}

impl HabitTemplate {
    /// Habit fields this template produces before any overrides
    pub fn details(&self) -> HabitDetails {
        HabitDetails {
            name: self.title.to_string(),
            description: self.description.to_string(),
            color: self.default_color,
            icon: self.icon.to_string(),
            frequency: self.frequency,
            target_per_week: self.target_per_week,
        }
    }
}

macro_rules! template {
    ($id:literal, $category:ident, $title:literal, $description:literal, $icon:literal,
     $color:ident, $frequency:ident, $target:literal, $difficulty:ident, $minutes:literal, $order:literal) => {
        HabitTemplate {
            id: $id,
            category: TemplateCategory::$category,
            title: $title,
            description: $description,
            icon: $icon,
            default_color: HabitColor::$color,
            frequency: Frequency::$frequency,
            target_per_week: $target,
            difficulty: Difficulty::$difficulty,
            estimated_minutes: $minutes,
            order: $order,
        }
    };
}

/// The catalogue, sorted by category then order
pub static TEMPLATES: &[HabitTemplate] = &[
    template!("health-1", Health, "Drink 2L Water", "Stay hydrated throughout the day", "water_drop", Blue, Daily, 7, Easy, 2, 1),
    template!("health-2", Health, "Sleep 8 Hours", "Get adequate rest for recovery", "bedtime", Violet, Daily, 7, Medium, 0, 2),
    template!("health-3", Health, "Take Vitamins", "Daily vitamin supplements", "medication", Teal, Daily, 7, Easy, 1, 3),
    template!("health-4", Health, "No Sugary Drinks", "Avoid soda and sugary beverages", "no_drinks", Red, Daily, 7, Medium, 0, 4),
    template!("health-5", Health, "Eat Breakfast", "Start your day with a healthy meal", "restaurant", Amber, Daily, 7, Easy, 15, 5),
    template!("productivity-1", Productivity, "Read 10 Pages", "Read a book or educational content", "menu_book", Amber, Daily, 7, Easy, 15, 1),
    template!("productivity-2", Productivity, "Deep Work 2 Hours", "Uninterrupted focused work session", "psychology", Blue, Daily, 5, Hard, 120, 2),
    template!("productivity-3", Productivity, "Clear Inbox", "Process all emails to zero", "inbox", Violet, Daily, 7, Medium, 20, 3),
    template!("productivity-4", Productivity, "Weekly Review", "Review goals and plan next week", "calendar_month", Teal, Weekly, 1, Medium, 30, 4),
    template!("productivity-5", Productivity, "Time Blocking", "Schedule your tasks for tomorrow", "schedule", Pink, Daily, 7, Easy, 10, 5),
    template!("mindfulness-1", Mindfulness, "Meditate 10 Minutes", "Practice mindfulness meditation", "self_improvement", Violet, Daily, 7, Easy, 10, 1),
    template!("mindfulness-2", Mindfulness, "Journal", "Write in your daily journal", "edit_note", Amber, Daily, 7, Easy, 10, 2),
    template!("mindfulness-3", Mindfulness, "Practice Gratitude", "List 3 things you are grateful for", "favorite", Pink, Daily, 7, Easy, 5, 3),
    template!("mindfulness-4", Mindfulness, "Digital Detox 1 Hour", "No screens for one hour before bed", "phone_disabled", Teal, Daily, 7, Medium, 60, 4),
    template!("mindfulness-5", Mindfulness, "Breathing Exercises", "5 minutes of deep breathing", "air", Blue, Daily, 7, Easy, 5, 5),
    template!("learning-1", Learning, "Code 1 Hour", "Practice programming skills", "code", Blue, Daily, 5, Medium, 60, 1),
    template!("learning-2", Learning, "Learn New Language", "Practice vocabulary or conversation", "translate", Violet, Daily, 7, Medium, 20, 2),
    template!("learning-3", Learning, "Take Online Course", "Complete one lesson from a course", "school", Amber, Daily, 5, Easy, 30, 3),
    template!("learning-4", Learning, "Listen to Podcast", "Educational podcast episode", "headphones", Pink, Daily, 7, Easy, 30, 4),
    template!("learning-5", Learning, "Flashcard Review", "Review spaced repetition cards", "style", Teal, Daily, 7, Easy, 10, 5),
    template!("fitness-1", Fitness, "Workout", "Exercise for at least 30 minutes", "fitness_center", Teal, Daily, 5, Medium, 45, 1),
    template!("fitness-2", Fitness, "Stretch", "Daily stretching routine", "accessibility_new", Amber, Daily, 7, Easy, 10, 2),
    template!("fitness-3", Fitness, "Walk 10k Steps", "Hit your daily step goal", "directions_walk", Blue, Daily, 7, Medium, 60, 3),
    template!("fitness-4", Fitness, "Morning Workout", "Exercise first thing in the morning", "wb_sunny", Orange, Daily, 5, Hard, 30, 4),
    template!("fitness-5", Fitness, "Posture Check", "Correct your posture throughout the day", "airline_seat_recline_normal", Violet, Daily, 7, Easy, 0, 5),
    template!("social-1", Social, "Call a Friend", "Connect with someone you care about", "call", Pink, Weekly, 1, Easy, 20, 1),
    template!("social-2", Social, "Spend Time with Family", "Quality time with family members", "family_restroom", Amber, Weekly, 2, Easy, 60, 2),
    template!("social-3", Social, "Networking", "Connect with professional contacts", "business", Blue, Weekly, 1, Medium, 30, 3),
    template!("social-4", Social, "Give a Compliment", "Make someone's day brighter", "thumb_up", Teal, Daily, 7, Easy, 1, 4),
    template!("creative-1", Creative, "Draw/Sketch", "Practice visual art", "brush", Orange, Daily, 5, Easy, 20, 1),
    template!("creative-2", Creative, "Write", "Creative writing practice", "edit", Violet, Daily, 5, Medium, 20, 2),
    template!("creative-3", Creative, "Play Music", "Practice an instrument", "music_note", Pink, Daily, 5, Medium, 30, 3),
    template!("creative-4", Creative, "Photography", "Take photos of your day", "photo_camera", Amber, Daily, 7, Easy, 15, 4),
    template!("creative-5", Creative, "Learn New Recipe", "Try cooking a new dish", "restaurant_menu", Teal, Weekly, 1, Medium, 60, 5),
];

/// Templates, optionally restricted to one category
pub fn templates_in(category: Option<TemplateCategory>) -> Vec<&'static HabitTemplate> {
    TEMPLATES
        .iter()
        .filter(|template| category.map_or(true, |c| template.category == c))
        .collect()
}

pub fn find_template(id: &str) -> Option<&'static HabitTemplate> {
    let id = id.trim();
    TEMPLATES.iter().find(|template| template.id == id)
}
