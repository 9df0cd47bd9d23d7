use crate::error::PersistError;
use crate::format::{MAX_RUN, PAIR_SIZE};

/// Coalesce a sequence of block types into `(type, run)` pairs.
///
/// Runs follow index order only; a run that reaches [`MAX_RUN`] is closed
/// and the next equal type opens a new pair.
pub fn encode_runs(types: impl IntoIterator<Item = u8>, out: &mut Vec<u8>) {
    let mut iter = types.into_iter();
    let Some(mut current) = iter.next() else {
        return;
    };
    let mut run = 1usize;

    for ty in iter {
        if ty == current && run < MAX_RUN {
            run += 1;
        } else {
            out.push(current);
            out.push(run as u8);
            current = ty;
            run = 1;
        }
    }

    out.push(current);
    out.push(run as u8);
}

/// Expand `(type, run)` pairs, calling `emit` once per block.
///
/// Fails if the data is not a whole number of pairs, contains a zero run,
/// or does not describe exactly `expected` blocks.
pub fn expand_runs(
    data: &[u8],
    expected: usize,
    mut emit: impl FnMut(u8),
) -> Result<(), PersistError> {
    if data.len() % PAIR_SIZE != 0 {
        return Err(PersistError::TruncatedRun(data.len()));
    }

    let mut total = 0usize;
    for (pair_index, pair) in data.chunks_exact(PAIR_SIZE).enumerate() {
        let ty = pair[0];
        let run = pair[1] as usize;
        if run == 0 {
            return Err(PersistError::EmptyRun(pair_index * PAIR_SIZE));
        }
        total += run;
        if total > expected {
            return Err(PersistError::BlockCountMismatch {
                expected,
                actual: total,
            });
        }
        for _ in 0..run {
            emit(ty);
        }
    }

    if total != expected {
        return Err(PersistError::BlockCountMismatch {
            expected,
            actual: total,
        });
    }

    Ok(())
}
