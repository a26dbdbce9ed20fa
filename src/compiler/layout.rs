use crate::document::Step;
use crate::graph::Position;
use ahash::AHashMap;

/// Spacing constants for the generated 2-D layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Position of the first node.
    pub origin: Position,
    /// Horizontal distance between sequential nodes.
    pub spacing: f64,
    /// Vertical distance between alternative branches sharing a column.
    pub branch_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin: Position(250.0, 300.0),
            spacing: 220.0,
            branch_spacing: 150.0,
        }
    }
}

/// Left-to-right placement with a horizontal cursor. Branch targets of a decision
/// share the column right after it and stack downwards.
pub(super) struct Layout {
    config: LayoutConfig,
    next_x: f64,
    placed: Vec<Position>,
    branch_columns: AHashMap<String, f64>,
}

impl Layout {
    pub(super) fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            next_x: config.origin.0,
            placed: Vec::new(),
            branch_columns: AHashMap::new(),
        }
    }

    pub(super) fn place_trigger(&mut self) -> Position {
        let position = Position(self.next_x, self.config.origin.1);
        self.commit(position);
        position
    }

    pub(super) fn place_step(&mut self, step: &Step) -> Position {
        let position = match self.branch_columns.get(&step.id) {
            Some(&x) => {
                let taken = self.placed.iter().filter(|p| p.0 == x).count();
                Position(
                    x,
                    self.config.origin.1 + taken as f64 * self.config.branch_spacing,
                )
            }
            None => Position(self.next_x, self.config.origin.1),
        };
        self.commit(position);

        if step.is_decision() {
            let column = position.0 + self.config.spacing;
            for target in step.successors() {
                self.branch_columns
                    .entry(target.to_string())
                    .or_insert(column);
            }
        }
        position
    }

    fn commit(&mut self, position: Position) {
        self.placed.push(position);
        self.next_x = self.next_x.max(position.0 + self.config.spacing);
    }
}
