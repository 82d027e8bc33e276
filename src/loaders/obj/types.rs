/// Knobs shared by the geometry and material parsers.
#[derive(Default, Clone, Debug)]
pub struct LoadOptions {
    /// Fail with `MissingReference` when a material library or texture map
    /// does not exist instead of skipping it.
    pub strict_references: bool,
}

impl LoadOptions {
    pub fn strict() -> Self {
        Self {
            strict_references: true,
        }
    }
}
