use crate::layout::{Layout, Shape};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub kind: &'static str,
    pub width: f32,
    pub height: f32,
    pub markers: Vec<&'a str>,
    /// Element count per class, for quick diffs between runs.
    pub classes: BTreeMap<&'a str, usize>,
    pub elements: Vec<ElementDump<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ElementDump<'a> {
    pub index: usize,
    pub class: Option<&'static str>,
    #[serde(flatten)]
    pub shape: &'a Shape,
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a Layout) -> Self {
        let mut classes = BTreeMap::new();
        for element in &layout.scene.elements {
            *classes.entry(element.class.unwrap_or("")).or_insert(0) += 1;
        }
        let elements = layout
            .scene
            .elements
            .iter()
            .enumerate()
            .map(|(index, element)| ElementDump {
                index,
                class: element.class,
                shape: &element.shape,
            })
            .collect();

        LayoutDump {
            kind: layout.kind.tag(),
            width: layout.width,
            height: layout.height,
            markers: layout.scene.markers.iter().map(|m| m.id.as_str()).collect(),
            classes,
            elements,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
