use std::cell::Cell;

use futures::FutureExt as _;
use futures::future::LocalBoxFuture;

use crate::foundation::core::{Aabb, Vec3};
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::foundation::ids::RenderableId;
use crate::scene::node::{NodeKind, ShapeKind};

/// One laid-out symbol of a text or formula renderable.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SymbolGlyph {
    /// Stable name derived from the glyph or role (not its index).
    pub name: String,
    /// Offset from the owning node's origin.
    pub offset: Vec3,
    /// Uniform glyph scale.
    pub scale: f32,
    /// Glyph bounds in its own frame.
    pub bounds: Aabb,
}

/// Opaque content produced by a [`RenderableFactory`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Renderable {
    /// Factory-issued handle.
    pub id: RenderableId,
    /// Bounds in the owning node's local frame.
    pub local_bounds: Aabb,
    /// Number of materials the content draws with.
    pub material_count: usize,
    /// Per-symbol layout for text and formulas; empty otherwise.
    pub symbols: Vec<SymbolGlyph>,
}

/// Asynchronous renderable creation collaborator.
///
/// Creation may suspend for an unpredictable time (font, formula or model loading). The
/// returned future must not touch engine state; the command sequencer applies its result.
pub trait RenderableFactory {
    /// Build content for `kind`.
    fn create(&self, kind: &NodeKind) -> LocalBoxFuture<'static, ChoreoResult<Renderable>>;
}

/// Deterministic in-process factory that never suspends.
///
/// Text gets one glyph per non-whitespace character and formulas one glyph per token, laid
/// out left to right and centered on the origin. Models whose path starts with `missing:`
/// fail with [`ChoreoError::AssetLoadFailure`].
#[derive(Debug)]
pub struct SyntheticFactory {
    next_id: Cell<u64>,
    advance: f32,
}

impl Default for SyntheticFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticFactory {
    /// Factory with a glyph advance of `0.6` units.
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            advance: 0.6,
        }
    }

    /// Build content synchronously.
    pub fn build(&self, kind: &NodeKind) -> ChoreoResult<Renderable> {
        let id = RenderableId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let (local_bounds, material_count, symbols) = match kind {
            NodeKind::Text { text } => {
                let cells: Vec<Option<String>> = text
                    .chars()
                    .map(|c| (!c.is_whitespace()).then(|| c.to_string()))
                    .collect();
                self.lay_out(cells)
            }
            NodeKind::Formula { source } => {
                let cells = formula_tokens(source).into_iter().map(Some).collect();
                self.lay_out(cells)
            }
            NodeKind::Line { points } => {
                let first = points.first().copied().unwrap_or(Vec3::ZERO);
                let bounds = points
                    .iter()
                    .fold(Aabb::new(first, first), |b, p| b.union(&Aabb::new(*p, *p)));
                (bounds, 1, Vec::new())
            }
            NodeKind::Frustum { near, far } => (
                Aabb::new(Vec3::new(-*far, -*far, -*far), Vec3::new(*far, *far, -*near)),
                1,
                Vec::new(),
            ),
            NodeKind::Shape(shape) => {
                let half = match shape {
                    ShapeKind::Circle { radius } => Vec3::new(*radius, *radius, 0.0),
                    ShapeKind::Rect { width, height } => Vec3::new(width / 2.0, height / 2.0, 0.0),
                    ShapeKind::Sphere { radius } => Vec3::splat(*radius),
                    ShapeKind::Box { size } => *size / 2.0,
                    ShapeKind::Model { path } => {
                        if path.starts_with("missing:") {
                            return Err(ChoreoError::asset(format!("model '{path}' not found")));
                        }
                        Vec3::splat(0.5)
                    }
                };
                (Aabb::centered(half), 1, Vec::new())
            }
            NodeKind::Generic | NodeKind::Group | NodeKind::Camera { .. } => {
                (Aabb::centered(Vec3::ZERO), 0, Vec::new())
            }
        };

        Ok(Renderable {
            id,
            local_bounds,
            material_count,
            symbols,
        })
    }

    fn lay_out(&self, cells: Vec<Option<String>>) -> (Aabb, usize, Vec<SymbolGlyph>) {
        let n = cells.len();
        let adv = self.advance;
        let x0 = -(n.saturating_sub(1) as f32) * adv / 2.0;
        let glyph_bounds = Aabb::centered(Vec3::new(adv / 2.0, 0.5, 0.0));

        let symbols = cells
            .into_iter()
            .enumerate()
            .filter_map(|(i, name)| {
                name.map(|name| SymbolGlyph {
                    name,
                    offset: Vec3::new(x0 + i as f32 * adv, 0.0, 0.0),
                    scale: 1.0,
                    bounds: glyph_bounds,
                })
            })
            .collect();
        let half_w = (n as f32) * adv / 2.0;
        (Aabb::centered(Vec3::new(half_w, 0.5, 0.0)), 0, symbols)
    }
}

impl RenderableFactory for SyntheticFactory {
    fn create(&self, kind: &NodeKind) -> LocalBoxFuture<'static, ChoreoResult<Renderable>> {
        futures::future::ready(self.build(kind)).boxed_local()
    }
}

/// Split a TeX-like formula into rendered symbol names.
///
/// Control words (`\frac`) and digit runs are single symbols; grouping and script markers
/// (`{`, `}`, `^`, `_`) and whitespace produce nothing.
pub fn formula_tokens(source: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' | '}' | '^' | '_' => {}
            c if c.is_whitespace() => {}
            '\\' => {
                let mut word = String::from('\\');
                while let Some(&n) = chars.peek() {
                    if !n.is_ascii_alphabetic() {
                        break;
                    }
                    word.push(n);
                    chars.next();
                }
                if word.len() == 1
                    && let Some(n) = chars.next()
                {
                    word.push(n);
                }
                out.push(word);
            }
            c if c.is_ascii_digit() => {
                let mut num = String::from(c);
                while let Some(&n) = chars.peek() {
                    if !(n.is_ascii_digit() || n == '.') {
                        break;
                    }
                    num.push(n);
                    chars.next();
                }
                out.push(num);
            }
            c => out.push(c.to_string()),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/collab/factory.rs"]
mod tests;
