use sha2::{Digest, Sha256};

use super::DEFAULT_DIFFICULTY;

/// The mining puzzle linking consecutive blocks: find a proof whose
/// SHA-256, taken over the previous proof concatenated with it, starts
/// with `difficulty` zero characters. Verification is a single hash;
/// generation is a linear search from zero.
#[derive(Debug, Clone, Copy)]
pub struct ProofOfWork {
    difficulty: u32,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl ProofOfWork {
    pub fn new(difficulty: u32) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Find the smallest proof accepted by `valid`. CPU-bound: blocks the
    /// calling thread until a proof is found, with expected cost growing
    /// sixteenfold per difficulty step.
    pub fn generate(&self, last_proof: u64) -> u64 {
        let mut proof = 0u64;
        while !self.valid(last_proof, proof) {
            proof += 1;
        }
        proof
    }

    /// Check a single candidate proof against the previous block's proof.
    pub fn valid(&self, last_proof: u64, proof: u64) -> bool {
        let guess = format!("{last_proof}{proof}");
        let guess_hash = hex::encode(Sha256::digest(guess.as_bytes()));
        guess_hash
            .chars()
            .take(self.difficulty as usize)
            .all(|c| c == '0')
    }
}

#[cfg(test)]
mod tests {
    use super::ProofOfWork;

    #[test]
    fn generated_proofs_always_verify() {
        let pow = ProofOfWork::new(1);
        for last_proof in [0u64, 1, 9, 25, 1000] {
            let proof = pow.generate(last_proof);
            assert!(pow.valid(last_proof, proof));
        }
    }

    #[test]
    fn generate_finds_the_smallest_proof() {
        let pow = ProofOfWork::new(2);
        let proof = pow.generate(1);
        assert_eq!(proof, 467);
        for smaller in 0..proof {
            assert!(!pow.valid(1, smaller));
        }
    }

    #[test]
    fn default_difficulty_matches_known_solution() {
        let pow = ProofOfWork::default();
        assert_eq!(pow.difficulty(), 4);
        assert_eq!(pow.generate(1), 72608);
        assert!(pow.valid(1, 72608));
        // The same proof against a different predecessor fails.
        assert!(!pow.valid(2, 72608));
    }
}
