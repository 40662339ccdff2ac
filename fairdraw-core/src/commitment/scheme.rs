/// Hash commitment over a secret's canonical text form.
///
/// The secret is committed as its hex string: the hash input is the bytes of
/// the string, not the decoded bytes. Producers and verifiers must agree on
/// this or every proof fails silently.
pub trait CommitmentScheme: Send + Sync {
    /// Lowercase hex digest of `secret`.
    fn commit(&self, secret: &str) -> String;

    fn verify(&self, commitment: &str, secret: &str) -> bool {
        self.commit(secret).eq_ignore_ascii_case(commitment.trim())
    }
}
