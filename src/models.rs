use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::recipe::PlanKind;

/// Request payload shared by every plan endpoint.
///
/// Fields stay loosely typed: callers send guest counts as numbers or strings
/// and the only check applied is a truthiness test on the two required fields.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub guests: Option<Value>,
    pub party_details: Option<Value>,
    pub appetizers: Option<Value>,
    pub main_courses: Option<Value>,
    pub side_dishes: Option<Value>,
    pub desserts: Option<Value>,
    pub beverages: Option<Value>,
    pub other_items: Option<Value>,
}

impl PlanRequest {
    /// Both required fields are present and truthy
    pub fn is_valid(&self) -> bool {
        is_truthy(self.guests.as_ref()) && is_truthy(self.party_details.as_ref())
    }

    /// Menu hints in field order, dropping falsy ones
    pub fn menu_hints(&self) -> Vec<String> {
        [
            &self.appetizers,
            &self.main_courses,
            &self.side_dishes,
            &self.desserts,
            &self.beverages,
            &self.other_items,
        ]
        .into_iter()
        .filter_map(|hint| hint.as_ref().filter(|v| is_truthy(Some(*v))))
        .map(render_value)
        .collect()
    }
}

/// Loose truthiness: null, false, zero and the empty string are falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Renders a request value for interpolation into a prompt
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationIdea {
    pub area: String,
    pub item: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub item: String,
    pub quantity: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTask {
    pub deadline: String,
    pub task: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub time: String,
    pub activity: String,
}

/// Typed view of what the model returns for each recipe.
///
/// The HTTP endpoints pass the upstream JSON through untouched; this is for
/// callers that want to inspect a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeneratedPlan {
    Decorations {
        #[serde(rename = "DecorationIdeas")]
        decoration_ideas: Vec<DecorationIdea>,
    },
    Menu {
        #[serde(rename = "Summary")]
        summary: String,
        #[serde(rename = "MenuPlan")]
        menu_plan: Vec<MenuItem>,
    },
    Tasks {
        #[serde(rename = "TaskList")]
        task_list: Vec<PlanTask>,
    },
    Timeline {
        #[serde(rename = "Timeline")]
        timeline: Vec<TimelineEntry>,
    },
}

#[derive(Deserialize)]
struct DecorationsBody {
    #[serde(rename = "DecorationIdeas")]
    decoration_ideas: Vec<DecorationIdea>,
}

#[derive(Deserialize)]
struct MenuBody {
    #[serde(rename = "Summary")]
    summary: String,
    #[serde(rename = "MenuPlan")]
    menu_plan: Vec<MenuItem>,
}

#[derive(Deserialize)]
struct TasksBody {
    #[serde(rename = "TaskList")]
    task_list: Vec<PlanTask>,
}

#[derive(Deserialize)]
struct TimelineBody {
    #[serde(rename = "Timeline")]
    timeline: Vec<TimelineEntry>,
}

impl GeneratedPlan {
    /// Reads a plan of the given kind out of parsed model output
    pub fn from_value(kind: PlanKind, value: Value) -> serde_json::Result<Self> {
        Ok(match kind {
            PlanKind::Decorations => {
                let body: DecorationsBody = serde_json::from_value(value)?;
                GeneratedPlan::Decorations {
                    decoration_ideas: body.decoration_ideas,
                }
            }
            PlanKind::Menu => {
                let body: MenuBody = serde_json::from_value(value)?;
                GeneratedPlan::Menu {
                    summary: body.summary,
                    menu_plan: body.menu_plan,
                }
            }
            PlanKind::Tasks => {
                let body: TasksBody = serde_json::from_value(value)?;
                GeneratedPlan::Tasks {
                    task_list: body.task_list,
                }
            }
            PlanKind::Timeline => {
                let body: TimelineBody = serde_json::from_value(value)?;
                GeneratedPlan::Timeline {
                    timeline: body.timeline,
                }
            }
        })
    }

    pub fn kind(&self) -> PlanKind {
        match self {
            GeneratedPlan::Decorations { .. } => PlanKind::Decorations,
            GeneratedPlan::Menu { .. } => PlanKind::Menu,
            GeneratedPlan::Tasks { .. } => PlanKind::Tasks,
            GeneratedPlan::Timeline { .. } => PlanKind::Timeline,
        }
    }

    /// Number of records in the plan's list
    pub fn len(&self) -> usize {
        match self {
            GeneratedPlan::Decorations { decoration_ideas } => decoration_ideas.len(),
            GeneratedPlan::Menu { menu_plan, .. } => menu_plan.len(),
            GeneratedPlan::Tasks { task_list } => task_list.len(),
            GeneratedPlan::Timeline { timeline } => timeline.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Response payload for the health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Service is healthy".to_string(),
        }
    }
}
