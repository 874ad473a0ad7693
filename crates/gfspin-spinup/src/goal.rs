//! What a spin-up attempt is looking for.

/// The condition under which one seed's spin-up counts as a success.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Goal {
    /// Any closure.
    Closure,
    /// A closure of dimension at most `max_dim`.
    Submodule {
        /// Largest acceptable dimension; must be below the module dimension.
        max_dim: usize,
    },
    /// A closure spanning the whole module.
    Cyclic,
}

/// How one attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The goal was reached.
    Success,
    /// The closure finished, or outgrew the goal, without reaching it.
    Failure,
    /// A better result was found elsewhere before this attempt finished.
    Abandoned,
}

impl Goal {
    /// Dimension above which expansion stops.
    pub(crate) fn cap(self, dim: usize) -> usize {
        match self {
            Goal::Submodule { max_dim } => max_dim,
            Goal::Closure | Goal::Cyclic => dim,
        }
    }

    /// Judges a closure that ran to completion with `nor` basis rows.
    pub(crate) fn judge(self, nor: usize, dim: usize) -> Outcome {
        let reached = match self {
            Goal::Closure => true,
            Goal::Submodule { max_dim } => nor <= max_dim,
            Goal::Cyclic => nor == dim,
        };
        if reached {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    pub(crate) fn assert_valid(self, dim: usize) {
        if let Goal::Submodule { max_dim } = self {
            assert!(
                max_dim < dim,
                "submodule search: max_dim {max_dim} must be below the dimension {dim}"
            );
        }
    }
}
