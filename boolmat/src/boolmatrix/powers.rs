use crate::{boolmatrix::BoolMatrix, packed_row::PackedRow};
use log::trace;

impl<R: PackedRow, const N: usize> BoolMatrix<R, N> {
    /// Raises the matrix to the power `exp` by repeated squaring. `pow(0)` is the identity
    pub fn pow(&self, mut exp: u64) -> Self {
        let mut result = Self::identity();
        let mut base = *self;
        while exp > 0 {
            if exp & 1 == 1 {
                result *= &base;
            }
            exp >>= 1;
            if exp > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// Returns `I + A + A^2 + ... + A^(N-1)`, which has a 1 at `(i, j)` iff `j` is reachable
    /// from `i` in the directed graph with adjacency matrix `A`, including `i` itself
    pub fn reflexive_transitive_closure(&self) -> Self {
        let mut closure = self | &Self::identity();
        // (I + A)^k is monotone in k and stops changing once k >= N - 1
        loop {
            let squared = &closure * &closure;
            if squared == closure {
                return closure;
            }
            closure = squared;
        }
    }

    /// Returns `A + A^2 + ... + A^N`, which has a 1 at `(i, j)` iff there is a non-empty path
    /// from `i` to `j` in the directed graph with adjacency matrix `A`
    pub fn transitive_closure(&self) -> Self {
        self * &self.reflexive_transitive_closure()
    }

    /// Returns the index `k` and period `p` of the sequence `A, A^2, A^3, ...`
    ///
    /// Boolean matrices have finitely many values, so the sequence is eventually periodic: `k`
    /// and `p` are the smallest positive integers with `A^(k + p) == A^k`. Uses Brent's cycle
    /// detection, so only a few matrices are held at a time, but the running time grows with
    /// `k + p`.
    pub fn index_and_period(&self) -> (usize, usize) {
        // find the period: the hare walks ahead, the tortoise jumps to it at powers of two
        let mut limit = 1;
        let mut period = 1;
        let mut tortoise = *self;
        let mut hare = self * self;
        while tortoise != hare {
            if period == limit {
                tortoise = hare;
                limit *= 2;
                period = 0;
            }
            hare *= self;
            period += 1;
        }

        // find the index: walk two powers `period` apart until they meet
        let mut tortoise = *self;
        let mut hare = self * &self.pow(period as u64);
        let mut index = 1;
        while tortoise != hare {
            tortoise *= self;
            hare *= self;
            index += 1;
        }

        trace!("index_and_period: A^{} == A^{}", index + period, index);
        (index, period)
    }
}

#[cfg(test)]
mod test {
    use crate::boolmatrix::{BoolMatrix16, BoolMatrix256, BoolMatrix32, BoolMatrix8};
    use rand::{rngs::SmallRng, SeedableRng};

    /// Adjacency matrix of the path 0 -> 1 -> ... -> N-1
    fn path8() -> BoolMatrix8 {
        BoolMatrix8::build(|i, j| j == i + 1)
    }

    /// Adjacency matrix of the cycle 0 -> 1 -> ... -> N-1 -> 0
    fn cycle8() -> BoolMatrix8 {
        BoolMatrix8::build(|i, j| j == (i + 1) % 8)
    }

    #[test]
    fn pow() {
        let mut rng = SmallRng::seed_from_u64(1);
        let m = BoolMatrix16::random(&mut rng);
        assert_eq!(m.pow(0), BoolMatrix16::identity());
        assert_eq!(m.pow(1), m);

        let mut expected = m;
        for exp in 2..12 {
            expected *= &m;
            assert_eq!(m.pow(exp), expected);
        }

        assert_eq!(cycle8().pow(8), BoolMatrix8::identity());
        assert_eq!(cycle8().pow(8 * 1000 + 3), cycle8().pow(3));
        assert!(path8().pow(8).is_zero());
    }

    #[test]
    fn closure_of_path() {
        let p = path8();
        assert_eq!(p.transitive_closure(), BoolMatrix8::build(|i, j| j > i));
        assert_eq!(
            p.reflexive_transitive_closure(),
            BoolMatrix8::build(|i, j| j >= i)
        );
        assert_eq!(cycle8().transitive_closure(), BoolMatrix8::ones());
    }

    #[test]
    fn closure_matches_power_sum() {
        let mut rng = SmallRng::seed_from_u64(3);
        // sparse random graph, so the closure is not trivially all ones
        let m = BoolMatrix256::build(|_, _| rand::Rng::random_ratio(&mut rng, 1, 300));

        let mut sum = m;
        let mut power = m;
        for _ in 1..256 {
            power *= &m;
            sum |= &power;
        }
        assert_eq!(m.transitive_closure(), sum);
        assert_eq!(
            m.reflexive_transitive_closure(),
            sum | BoolMatrix256::identity()
        );
    }

    #[test]
    fn index_and_period() {
        assert_eq!(cycle8().index_and_period(), (1, 8));
        assert_eq!(path8().index_and_period(), (8, 1));
        assert_eq!(BoolMatrix8::identity().index_and_period(), (1, 1));
        assert_eq!(BoolMatrix8::zeros().index_and_period(), (1, 1));

        // two disjoint cycles of lengths 3 and 5 have period lcm(3, 5)
        let m = BoolMatrix8::build(|i, j| {
            if i < 3 {
                j == (i + 1) % 3
            } else {
                j == 3 + (i - 2) % 5
            }
        });
        assert_eq!(m.index_and_period(), (1, 15));
        assert_eq!(m.pow(16), m);
        assert!(m.as_rows().iter().all(|row| row.count_ones() == 1));
    }

    /// Cycles of lengths 3, 5, 7 and 11 on vertices 0..26, fed by the path 31 -> ... -> 26 -> 0
    fn cycles_with_tail() -> BoolMatrix32 {
        let mut m = BoolMatrix32::zeros();
        let mut start = 0;
        for len in [3, 5, 7, 11] {
            for i in 0..len {
                m.set_bit(start + i, start + (i + 1) % len, true);
            }
            start += len;
        }
        for i in 27..32 {
            m.set_bit(i, i - 1, true);
        }
        m.set_bit(26, 0, true);
        m
    }

    #[test]
    fn index_and_period_long_cycle() {
        let m = cycles_with_tail();
        // the walk from 31 needs 6 steps to reach a cycle; the period is 3 * 5 * 7 * 11
        assert_eq!(m.index_and_period(), (6, 1155));
        assert_eq!(m.pow(6 + 1155), m.pow(6));
        assert_ne!(m.pow(5 + 1155), m.pow(5));
        assert_ne!(m.pow(6 + 385), m.pow(6));
        assert_ne!(m.pow(6 + 231), m.pow(6));
    }
}
