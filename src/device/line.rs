/// One element of a [`Line`]'s ordered series decomposition.
///
/// Parts are not components and hold no pins of their own; they are
/// accessed only through their owning `Line`. `pos_potential`/
/// `neg_potential`/`current` are filled in by the Line's `propagate`
/// step after each solve.
#[derive(Debug, Clone)]
pub struct Part {
    pub resistance: f64,
    pub current: f64,
    pub pos_potential: f64,
    pub neg_potential: f64,
}

impl Part {
    pub fn new(resistance: f64) -> Self {
        Part {
            resistance,
            current: 0.0,
            pos_potential: 0.0,
            neg_potential: 0.0,
        }
    }
}

/// A resistor-typed component whose resistance is the sum of an ordered
/// list of [`Part`]s, produced by the `LineCompiler`'s compression of a
/// maximal chain of series virtual resistors into a single MNA stamp.
///
/// Invariant: `resistance() == parts.iter().map(|p| p.resistance).sum()`
/// after construction and after any part resistance mutation. Part order
/// runs from the Line's `pos` terminal to its `neg` terminal.
#[derive(Debug, Clone)]
pub struct Line {
    pub parts: Vec<Part>,
    resistance: f64,
}

impl Line {
    pub fn from_parts(parts: Vec<Part>) -> Self {
        let resistance = parts.iter().map(|p| p.resistance).sum();
        Line { parts, resistance }
    }

    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }

    /// Recomputes the cached total after a part's resistance changed.
    pub fn recompute_resistance(&mut self) {
        self.resistance = self.parts.iter().map(|p| p.resistance).sum();
    }

    /// Distributes the line's solved `pos`/`neg` potentials and total
    /// current across each part, proportionally to its share of the
    /// total resistance.
    pub fn propagate(&mut self, pos_potential: f64, neg_potential: f64) {
        let total_drop = pos_potential - neg_potential;
        let current = if self.resistance != 0.0 {
            total_drop / self.resistance
        } else {
            0.0
        };
        let mut cursor = pos_potential;
        for part in &mut self.parts {
            part.current = current;
            part.pos_potential = cursor;
            let drop = current * part.resistance;
            cursor -= drop;
            part.neg_potential = cursor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resistance_is_sum_of_parts() {
        let parts: Vec<Part> = (1..=50).map(|r| Part::new(r as f64)).collect();
        let line = Line::from_parts(parts);
        let expected: f64 = (1..=50).sum::<i64>() as f64;
        assert!((line.resistance() - expected).abs() < 1e-9);
        assert_eq!(line.resistance(), 1275.0);
    }

    #[test]
    fn propagate_splits_drop_by_resistance_ratio() {
        let parts = vec![Part::new(10.0), Part::new(20.0), Part::new(30.0)];
        let mut line = Line::from_parts(parts);
        line.propagate(60.0, 0.0);
        // total R=60, V=60 => I=1A through every part
        assert!((line.parts[0].current - 1.0).abs() < 1e-12);
        assert!((line.parts[0].pos_potential - 60.0).abs() < 1e-12);
        assert!((line.parts[0].neg_potential - 50.0).abs() < 1e-12);
        assert!((line.parts[1].neg_potential - 30.0).abs() < 1e-12);
        assert!((line.parts[2].neg_potential - 0.0).abs() < 1e-9);
    }

    #[test]
    fn recompute_resistance_after_part_mutation() {
        let parts = vec![Part::new(5.0), Part::new(5.0)];
        let mut line = Line::from_parts(parts);
        assert_eq!(line.resistance(), 10.0);
        line.parts[0].resistance = 15.0;
        line.recompute_resistance();
        assert_eq!(line.resistance(), 20.0);
    }
}
