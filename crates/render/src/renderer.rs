use glam::IVec3;
use stockroom_common::{Entity, GridPos};
use stockroom_kernel::{GridState, LAYER_ABOVE, LAYER_BELOW};

/// What a renderer may ask about the game each frame.
pub trait GridView {
    /// Entity at `pos`; `Entity::Nothing` outside the grid.
    fn entity_at(&self, pos: GridPos) -> Entity;

    /// `(x extent, layers per column, longest row)`.
    fn grid_bounds(&self) -> (usize, usize, usize);

    fn controlled_position(&self) -> GridPos;

    fn is_in_bounds(&self, pos: GridPos) -> bool;
}

impl GridView for GridState {
    fn entity_at(&self, pos: GridPos) -> Entity {
        GridState::entity_at(self, pos)
    }

    fn grid_bounds(&self) -> (usize, usize, usize) {
        self.bounds()
    }

    fn controlled_position(&self) -> GridPos {
        GridState::controlled_position(self)
    }

    fn is_in_bounds(&self, pos: GridPos) -> bool {
        GridState::is_in_bounds(self, pos)
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the grid through `GridView` and produces output. It never
/// mutates game state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render<V: GridView + ?Sized>(&self, view: &V) -> Self::Output;
}

/// Draws the grid back in Sokoban notation, highest `x` first.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }

    fn symbol(below: Entity, above: Entity) -> char {
        match (below, above) {
            (Entity::Goal, Entity::Player) => '+',
            (_, Entity::Player) => '@',
            (Entity::Goal, Entity::Box) => '*',
            (_, Entity::Box) => '$',
            (_, Entity::Wall) | (Entity::Wall, _) => '#',
            (Entity::Goal, _) => '.',
            _ => ' ',
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render<V: GridView + ?Sized>(&self, view: &V) -> String {
        let (rows, _, width) = view.grid_bounds();
        let mut out = String::new();
        for x in (0..rows as i32).rev() {
            let mut line = String::with_capacity(width);
            for z in 0..width as i32 {
                let above = IVec3::new(x, LAYER_ABOVE, z);
                if !view.is_in_bounds(above) {
                    break;
                }
                let below = view.entity_at(IVec3::new(x, LAYER_BELOW, z));
                line.push(Self::symbol(below, view.entity_at(above)));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_levels::Blueprint;

    const LEVEL: &str = "\
  #####
###   #
#.@$  #
### $.#
#.##$ #
# # . ##
#$ *$$.#
#   .  #
########";

    #[test]
    fn renders_blueprint_back() {
        let grid = GridState::from_blueprint(&Blueprint::from_text(LEVEL)).unwrap();
        let output = DebugTextRenderer::new().render(&grid);
        assert_eq!(output, format!("{LEVEL}\n"));
    }

    #[test]
    fn player_on_goal_renders_plus() {
        let grid = GridState::from_blueprint(&Blueprint::from_text("####\n#+$ #\n#  .#\n#####"))
            .unwrap();
        let output = DebugTextRenderer::new().render(&grid);
        assert!(output.lines().nth(1).unwrap().starts_with("#+$"));
    }

    #[test]
    fn view_answers_nothing_outside() {
        let grid = GridState::from_blueprint(&Blueprint::from_text("#####\n#@$.#\n#####")).unwrap();
        let view: &dyn GridView = &grid;
        assert_eq!(view.entity_at(IVec3::new(9, 1, 9)), Entity::Nothing);
        assert_eq!(view.grid_bounds(), (3, 2, 5));
        assert_eq!(view.entity_at(view.controlled_position()), Entity::Player);
    }
}
