//! Prompt recipes: one per plan endpoint.
//!
//! A recipe is pure data (route, persona, context template, output shape and
//! failure message). The pipeline in [`crate::pipeline`] runs every recipe the
//! same way.

use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};

use crate::models::{PlanRequest, render_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanKind {
    Decorations,
    Menu,
    Tasks,
    Timeline,
}

impl PlanKind {
    pub const ALL: [PlanKind; 4] = [
        PlanKind::Decorations,
        PlanKind::Menu,
        PlanKind::Tasks,
        PlanKind::Timeline,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlanKind::Decorations => "decorations",
            PlanKind::Menu => "menu",
            PlanKind::Tasks => "tasks",
            PlanKind::Timeline => "timeline",
        }
    }

    pub fn recipe(self) -> &'static Recipe {
        match self {
            PlanKind::Decorations => &DECORATIONS,
            PlanKind::Menu => &MENU,
            PlanKind::Tasks => &TASKS,
            PlanKind::Timeline => &TIMELINE,
        }
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlanKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlanKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown recipe '{}'", s))
    }
}

/// Everything that distinguishes one plan endpoint from another
#[derive(Debug)]
pub struct Recipe {
    pub kind: PlanKind,
    pub path: &'static str,
    /// Persona and task instruction; may reference `{guests}`
    pub role: &'static str,
    /// Event context line; may reference `{details}`, `{guests}`, `{menu_items}`
    pub context: &'static str,
    /// `error` field of the 500 body
    pub failure_message: &'static str,
    schema: fn() -> Value,
}

pub static DECORATIONS: Recipe = Recipe {
    kind: PlanKind::Decorations,
    path: "/api/decorations",
    role: "You are a creative party stylist and theme designer. Your task is to generate original decoration ideas that match the event's theme and vibe. Ensure all output strictly follows the required JSON schema.",
    context: "Event Details: {details}. Guest Count: {guests}. Generate creative and cohesive decoration ideas for the event.",
    failure_message: "Failed to generate Decoration Ideas.",
    schema: decorations_schema,
};

pub static MENU: Recipe = Recipe {
    kind: PlanKind::Menu,
    path: "/api/menu",
    role: "You are a professional caterer and event planner. Your sole task is to generate a comprehensive shopping list (MenuPlan) and a short Summary for an event. You must accurately estimate quantities based on {guests} guests and the specified items. The output MUST strictly follow the JSON schema.",
    context: "Event Details: {details}. Guest Count: {guests}. User Menu Suggestions (calculate quantities for these items): {menu_items}. Generate only the 'Summary' and the 'MenuPlan' array.",
    failure_message: "Failed to generate menu and shopping list.",
    schema: menu_schema,
};

pub static TASKS: Recipe = Recipe {
    kind: PlanKind::Tasks,
    path: "/api/tasks",
    role: "You are a professional event coordinator. Your task is to generate a chronological list of essential tasks and deadlines required in the weeks leading up to the event. Focus on logistics, RSVPs, and preparation. Ensure all output strictly follows the required JSON schema.",
    context: "Event Details: {details}. Guest Count: {guests}. Generate a task list leading up to the event day.",
    failure_message: "Failed to generate Pre-Event To-Do List.",
    schema: tasks_schema,
};

pub static TIMELINE: Recipe = Recipe {
    kind: PlanKind::Timeline,
    path: "/api/timeline",
    role: "You are a meticulous event floor manager. Your task is to generate a detailed, hour-by-hour schedule for the event day, covering setup, guest arrival, main activities, and breakdown. Ensure all output strictly follows the required JSON schema.",
    context: "Event Details: {details}. Guest Count: {guests}. Generate a precise day-of schedule starting from setup until final cleanup.",
    failure_message: "Failed to generate Day-of Schedule.",
    schema: timeline_schema,
};

impl Recipe {
    /// Advisory output shape handed to the model
    pub fn schema(&self) -> Value {
        (self.schema)()
    }

    /// Role instruction and event context, newline separated.
    ///
    /// Callers validate the request first; absent fields render as empty text.
    pub fn render_prompt(&self, request: &PlanRequest) -> String {
        let guests = request.guests.as_ref().map(render_value).unwrap_or_default();
        let details = request
            .party_details
            .as_ref()
            .map(render_value)
            .unwrap_or_default();
        let menu_items = request.menu_hints().join(", ");

        let vars = [
            ("guests", guests.as_str()),
            ("details", details.as_str()),
            ("menu_items", menu_items.as_str()),
        ];

        format!(
            "{}\n{}",
            render_template(self.role, &vars),
            render_template(self.context, &vars)
        )
    }
}

/// Single-pass `{name}` substitution.
///
/// Substituted text is never rescanned, so braces inside user input are left
/// alone. Unknown placeholders are kept verbatim.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let known = after.find('}').and_then(|end| {
            let name = &after[..end];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });

        match known {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Array of objects whose listed fields are all required strings
fn string_record_array(description: &str, fields: &[(&str, Option<&str>)]) -> Value {
    let mut properties = serde_json::Map::new();
    for (name, field_description) in fields {
        let mut property = json!({ "type": "STRING" });
        if let Some(text) = field_description {
            property["description"] = json!(text);
        }
        properties.insert((*name).to_string(), property);
    }
    let required: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();

    json!({
        "type": "ARRAY",
        "description": description,
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": required,
        }
    })
}

fn decorations_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "DecorationIdeas": string_record_array(
                "Ideas for decorations tailored to the theme/vibe.",
                &[
                    ("area", Some("The area for the decoration (e.g., 'Entrance', 'Tables', 'Photo Booth').")),
                    ("item", Some("The specific decoration item.")),
                    ("style", Some("The style or color scheme (e.g., 'Tropical', 'Minimalist Black & Gold').")),
                ],
            )
        },
        "required": ["DecorationIdeas"]
    })
}

fn menu_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "Summary": {
                "type": "STRING",
                "description": "A single, concise paragraph summarizing the menu plan, theme, and key logistical notes related to food."
            },
            "MenuPlan": string_record_array(
                "A detailed list of food and beverage items with calculated quantities based on guest count.",
                &[
                    ("item", None),
                    ("quantity", Some("The calculated quantity and unit (e.g., '5 lbs', '2 cases', '200 pieces').")),
                    ("category", Some("The type of food/drink (e.g., 'Main Course', 'Appetizer', 'Beverage', 'Supply').")),
                ],
            )
        },
        "required": ["Summary", "MenuPlan"]
    })
}

fn tasks_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "TaskList": string_record_array(
                "A list of critical tasks to complete before the event day.",
                &[
                    ("deadline", Some("When the task should be completed (e.g., '1 Week Before', 'Day Before').")),
                    ("task", Some("The specific task description.")),
                ],
            )
        },
        "required": ["TaskList"]
    })
}

fn timeline_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "Timeline": string_record_array(
                "A detailed schedule for the day of the event.",
                &[
                    ("time", Some("The specific time or time range (e.g., '4:00 PM', '5:30 PM - 6:30 PM').")),
                    ("activity", Some("The activity or event happening.")),
                ],
            )
        },
        "required": ["Timeline"]
    })
}
