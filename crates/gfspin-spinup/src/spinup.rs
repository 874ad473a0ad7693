//! Single-threaded spin-up entry points.

use gfspin_linalg::{map_row, Matrix};
use tracing::debug;

use crate::error::ScriptError;
use crate::goal::Goal;
use crate::repr::Representation;
use crate::script::Script;
use crate::seed::{SeedMode, SeedSource};
use crate::workspace::{SpinUpResult, Workspace, WorkspaceOptions};

/// The smallest invariant subspace containing every row of `seeds`.
///
/// The result is in semi-echelon form with a pivot table.
///
/// # Panics
///
/// Panics if `seeds` does not fit `repr` or contains a zero row.
#[must_use]
pub fn spin_up(seeds: &Matrix, repr: &Representation) -> Matrix {
    spin_up_all(seeds, repr, SeedMode::Each, WorkspaceOptions::default()).basis
}

/// Spins up the seeds selected by `mode` and returns the standard basis of
/// their closure, together with a script if `script` is set.
///
/// The closure need not be the whole module; callers that expect a cyclic
/// vector must check `basis.nor()`.
///
/// # Panics
///
/// Panics if `seeds` does not fit `repr`, if a seed is zero, or in
/// [`SeedMode::Make`] if the seed rows are dependent.
#[must_use]
pub fn spin_up_standard_basis(
    seeds: &Matrix,
    repr: &Representation,
    mode: SeedMode,
    script: bool,
) -> SpinUpResult {
    let options = WorkspaceOptions {
        standard: true,
        script,
    };
    spin_up_all(seeds, repr, mode, options)
}

fn spin_up_all(
    seeds: &Matrix,
    repr: &Representation,
    mode: SeedMode,
    options: WorkspaceOptions,
) -> SpinUpResult {
    repr.assert_seeds(seeds, "spin-up");
    let source = SeedSource::new(seeds.clone(), mode);
    let mut ws = Workspace::new(repr.field(), repr.dim(), options);
    for index in 1..=source.len() {
        // Every given row is still checked for zero; generated seeds are not
        // needed once the module is full.
        if ws.is_full() && mode == SeedMode::Make {
            break;
        }
        if ws.add_seed(&source, index) {
            ws.close(repr, Goal::Closure.cap(repr.dim()), &|| false);
        }
    }
    debug!(
        seeds = source.len(),
        dim = repr.dim(),
        closure = ws.nor(),
        standard = options.standard,
        "spin-up finished"
    );
    ws.cede()
}

/// Replays `script` on the seeds selected by `mode` under `repr`.
///
/// With the seeds and representation a script was recorded on, this returns
/// the standard basis it was recorded with. After a change of basis by `A`
/// (seeds `S·A`, generators `A⁻¹·g·A`) it returns that basis times `A`.
///
/// # Panics
///
/// Panics if `seeds` does not fit `repr`, or if the script is malformed or
/// refers to a missing seed or generator.
#[must_use]
pub fn spin_up_with_script(
    seeds: &Matrix,
    repr: &Representation,
    mode: SeedMode,
    script: &Script,
) -> Matrix {
    repr.assert_seeds(seeds, "spin_up_with_script");
    if let Err(err) = script.validate(repr.ngen()) {
        panic!("spin_up_with_script: {err}");
    }
    let source = SeedSource::new(seeds.clone(), mode);
    let field = repr.field();
    let mut basis = Matrix::zeros(field, script.len(), repr.dim());

    for (row, entry) in script.entries().iter().enumerate() {
        match entry.generator {
            None => {
                if entry.source >= source.len() {
                    let err = ScriptError::Seed {
                        row,
                        seed: entry.source,
                        seeds: source.len(),
                    };
                    panic!("spin_up_with_script: {err}");
                }
                source.seed_into(entry.source + 1, basis.row_mut(row));
            }
            Some(g) => {
                let image_of = basis.row(entry.source).to_vec();
                map_row(field, &image_of, repr.generator(g), basis.row_mut(row));
            }
        }
    }
    basis
}
