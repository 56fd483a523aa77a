use crate::{board::Position, movegen::legal_moves_into, types::Move};

/// Pure perft node count.
/// Counts all legal positions from `pos` down to `depth`.
pub fn perft(pos: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    fn inner(pos: &mut Position, depth: u8, layers: &mut [Vec<Move>]) -> u64 {
        let (buf, rest) = layers
            .split_first_mut()
            .expect("perft requires one buffer per remaining ply");

        legal_moves_into(pos, buf);
        if depth == 1 {
            return buf.len() as u64;
        }

        let mut nodes = 0u64;
        for mv in buf.iter().copied() {
            let undo = pos.make_move(mv);
            nodes += inner(pos, depth - 1, rest);
            pos.unmake_move(mv, undo);
        }
        nodes
    }

    let mut scratch = pos.clone();
    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(&mut scratch, depth, &mut layers[..])
}

/// Node counts split by root move, in long algebraic form.
pub fn perft_divide(pos: &Position, depth: u8) -> Vec<(String, u64)> {
    let mut scratch = pos.clone();
    let mut root = Vec::new();
    legal_moves_into(&mut scratch, &mut root);
    root.into_iter()
        .map(|mv| {
            let undo = scratch.make_move(mv);
            let nodes = perft(&scratch, depth.saturating_sub(1));
            scratch.unmake_move(mv, undo);
            (mv.to_string(), nodes)
        })
        .collect()
}
