use serde::{Deserialize, Deserializer, Serialize};

/// The eight diagram variants a record can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagramKind {
    Fishbone,
    Pareto,
    ActionPlan,
    Brainwriting,
    MindMap,
    Swot,
    Radar,
    Timeline,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 8] = [
        DiagramKind::Fishbone,
        DiagramKind::Pareto,
        DiagramKind::ActionPlan,
        DiagramKind::Brainwriting,
        DiagramKind::MindMap,
        DiagramKind::Swot,
        DiagramKind::Radar,
        DiagramKind::Timeline,
    ];

    /// Wire tag, e.g. `ACTION_PLAN`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Fishbone => "FISHBONE",
            Self::Pareto => "PARETO",
            Self::ActionPlan => "ACTION_PLAN",
            Self::Brainwriting => "BRAINWRITING",
            Self::MindMap => "MIND_MAP",
            Self::Swot => "SWOT",
            Self::Radar => "RADAR",
            Self::Timeline => "TIMELINE",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized = tag.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|kind| kind.tag() == normalized)
    }

    /// Human readable label, e.g. `ACTION PLAN`.
    pub fn label(self) -> String {
        self.tag().replace('_', " ")
    }

    /// Lowercase stem used for exported file names, e.g. `action_plan`.
    pub fn file_stem(self) -> String {
        self.tag().to_ascii_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagramRecord {
    Fishbone(FishboneRecord),
    Pareto(ParetoRecord),
    ActionPlan(RadialRecord),
    Brainwriting(BrainwritingRecord),
    MindMap(RadialRecord),
    Swot(SwotRecord),
    Radar(RadarRecord),
    Timeline(TimelineRecord),
}

impl DiagramRecord {
    pub fn kind(&self) -> DiagramKind {
        match self {
            Self::Fishbone(_) => DiagramKind::Fishbone,
            Self::Pareto(_) => DiagramKind::Pareto,
            Self::ActionPlan(_) => DiagramKind::ActionPlan,
            Self::Brainwriting(_) => DiagramKind::Brainwriting,
            Self::MindMap(_) => DiagramKind::MindMap,
            Self::Swot(_) => DiagramKind::Swot,
            Self::Radar(_) => DiagramKind::Radar,
            Self::Timeline(_) => DiagramKind::Timeline,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FishboneRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub problem: String,
    #[serde(deserialize_with = "lenient_vec")]
    pub categories: Vec<FishboneCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FishboneCategory {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParetoRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_vec")]
    pub items: Vec<ParetoItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParetoItem {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_number")]
    pub value: f64,
}

/// Shared by action plans and mind maps: a central topic with radial nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadialRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub central_topic: String,
    #[serde(deserialize_with = "lenient_vec")]
    pub nodes: Vec<RadialNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadialNode {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrainwritingRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub topic: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub columns: Vec<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub rows: Vec<BrainwritingRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrainwritingRow {
    #[serde(deserialize_with = "lenient_string")]
    pub participant: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub ideas: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwotRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub topic: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub weaknesses: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub opportunities: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub threats: Vec<String>,
}

impl SwotRecord {
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
            && self.weaknesses.is_empty()
            && self.opportunities.is_empty()
            && self.threats.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadarRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_vec")]
    pub axes: Vec<RadarAxis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadarAxis {
    #[serde(deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(deserialize_with = "lenient_number")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_vec")]
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineEvent {
    #[serde(deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

/// Full response of the analysis service: a summary plus up to a handful of diagrams.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    pub summary: String,
    pub diagrams: Vec<DiagramRecord>,
}

// The upstream generator is an LLM; nulls, bare scalars and stringified
// numbers show up often enough that strict typing would drop whole diagrams.

/// Text for a loosely typed value; `None` only for null.
fn scalar_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(scalar_text(value).unwrap_or_default())
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(scalar_text(value))
}

/// String lists: null elements are dropped, scalars are stringified, a bare
/// value becomes a one-element list.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if parsed.is_finite() { parsed } else { 0.0 })
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
            .collect(),
        other => serde_json::from_value(other)
            .map(|single| vec![single])
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_round_trip_through_labels() {
        assert_eq!(DiagramKind::from_tag("action plan"), Some(DiagramKind::ActionPlan));
        assert_eq!(DiagramKind::from_tag("MIND_MAP"), Some(DiagramKind::MindMap));
        assert_eq!(DiagramKind::from_tag("gantt"), None);
        assert_eq!(DiagramKind::ActionPlan.label(), "ACTION PLAN");
        assert_eq!(DiagramKind::MindMap.file_stem(), "mind_map");
    }

    #[test]
    fn missing_sequences_default_to_empty() {
        let record: DiagramRecord =
            serde_json::from_str(r#"{"type":"FISHBONE","problem":"Late deliveries"}"#).unwrap();
        let DiagramRecord::Fishbone(fishbone) = record else {
            panic!("expected fishbone");
        };
        assert_eq!(fishbone.problem, "Late deliveries");
        assert!(fishbone.categories.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let record: DiagramRecord = serde_json::from_str(
            r#"{"type":"RADAR","title":"Skills","confidence":0.9,"axes":[{"label":"Go","value":70,"unit":"pts"}]}"#,
        )
        .unwrap();
        assert_eq!(record.kind(), DiagramKind::Radar);
    }

    #[test]
    fn numbers_accept_strings_and_null() {
        let record: ParetoRecord = serde_json::from_str(
            r#"{"title":"Defects","items":[{"name":"A","value":"12"},{"name":"B","value":null},{"name":"C","value":"40%"}]}"#,
        )
        .unwrap();
        let values: Vec<f64> = record.items.iter().map(|item| item.value).collect();
        assert_eq!(values, vec![12.0, 0.0, 40.0]);
    }

    #[test]
    fn string_lists_tolerate_nulls_and_scalars() {
        let record: DiagramRecord = serde_json::from_str(
            r#"{"type":"SWOT","topic":"Market","strengths":["a",null,"b"],"threats":"Churn"}"#,
        )
        .unwrap();
        let DiagramRecord::Swot(swot) = record else {
            panic!("expected swot");
        };
        assert_eq!(swot.strengths, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(swot.threats, vec!["Churn".to_string()]);

        let fishbone: FishboneRecord = serde_json::from_str(
            r#"{"problem":"Scrap","categories":[{"name":"Machine","items":["x",3,true]}]}"#,
        )
        .unwrap();
        assert_eq!(fishbone.categories[0].items, vec!["x", "3", "true"]);

        let brainwriting: BrainwritingRecord = serde_json::from_str(
            r#"{"topic":"Ideas","columns":[1,2,null],"rows":[{"participant":7,"ideas":[null,"go"]}]}"#,
        )
        .unwrap();
        assert_eq!(brainwriting.columns, vec!["1", "2"]);
        assert_eq!(brainwriting.rows[0].participant, "7");
        assert_eq!(brainwriting.rows[0].ideas, vec!["go"]);
    }

    #[test]
    fn timeline_description_accepts_scalars() {
        let record: TimelineRecord = serde_json::from_str(
            r#"{"title":"Plan","events":[{"date":2024,"title":"Kickoff","description":5},{"date":"Q2","title":"Beta","description":null},{"date":"Q3","title":"GA"}]}"#,
        )
        .unwrap();
        assert_eq!(record.events[0].date, "2024");
        assert_eq!(record.events[0].description.as_deref(), Some("5"));
        assert_eq!(record.events[1].description, None);
        assert_eq!(record.events[2].description, None);
    }

    #[test]
    fn camel_case_fields_are_read() {
        let record: DiagramRecord = serde_json::from_str(
            r#"{"type":"MIND_MAP","centralTopic":"Launch","nodes":[{"title":"Marketing","items":["Ads"]}]}"#,
        )
        .unwrap();
        let DiagramRecord::MindMap(mind_map) = record else {
            panic!("expected mind map");
        };
        assert_eq!(mind_map.central_topic, "Launch");
        assert_eq!(mind_map.nodes[0].items, vec!["Ads".to_string()]);
    }
}
