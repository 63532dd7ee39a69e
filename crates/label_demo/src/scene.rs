//! Demo entities

use label_engine::foundation::math::Vec3;
use label_engine::render::label::{LabelLine, LabelSubject};

/// A named entity standing somewhere in the demo scene
#[derive(Debug, Clone)]
pub struct DemoEntity {
    /// Formatted display name
    pub name: String,
    /// Feet position
    pub position: Vec3,
    /// Visual height
    pub height: f32,
    /// Whether the entity is sneaking
    pub sneaking: bool,
    /// Lines stacked below the name
    pub lines: LabelLine,
}

impl DemoEntity {
    fn new(name: &str, position: Vec3) -> Self {
        Self {
            name: name.to_string(),
            position,
            height: 1.8,
            sneaking: false,
            lines: LabelLine::default(),
        }
    }
}

impl LabelSubject for DemoEntity {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn is_sneaking(&self) -> bool {
        self.sneaking
    }
}

/// The fixed cast of the demo
pub fn cast() -> Vec<DemoEntity> {
    let mut builder = DemoEntity::new("§6Builder§r Alex", Vec3::new(4.0, 64.0, -2.0));
    builder.lines = LabelLine::default().with_subtitle("§7Working on spawn", 0.8);

    let mut champion = DemoEntity::new("§c§nChampion§r Steve", Vec3::new(-3.0, 65.0, 6.0));
    champion.lines = LabelLine::default().with_score("12 §eWins");

    let mut lurker = DemoEntity::new("§kHidden", Vec3::new(0.0, 63.0, 9.0));
    lurker.sneaking = true;

    let mut pig = DemoEntity::new("Pig", Vec3::new(1.5, 64.0, 1.5));
    pig.height = 0.9;

    vec![builder, champion, lurker, pig]
}
