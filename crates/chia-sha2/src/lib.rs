#[cfg(not(feature = "openssl"))]
mod rust_crypto {
    use sha2::Digest;

    #[derive(Clone)]
    pub struct Sha256(sha2::Sha256);

    impl Sha256 {
        pub fn new() -> Self {
            Self(sha2::Sha256::new())
        }

        pub fn update(&mut self, data: impl AsRef<[u8]>) {
            self.0.update(data);
        }

        pub fn finalize(self) -> [u8; 32] {
            self.0.finalize().into()
        }
    }

    impl Default for Sha256 {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(feature = "openssl")]
mod openssl_backend {
    use openssl::sha::Sha256 as OpensslSha256;

    #[derive(Clone, Default)]
    pub struct Sha256(OpensslSha256);

    impl Sha256 {
        pub fn new() -> Self {
            Self(OpensslSha256::new())
        }

        pub fn update(&mut self, data: impl AsRef<[u8]>) {
            self.0.update(data.as_ref());
        }

        pub fn finalize(self) -> [u8; 32] {
            self.0.finish()
        }
    }
}

#[cfg(not(feature = "openssl"))]
pub use rust_crypto::Sha256;

#[cfg(feature = "openssl")]
pub use openssl_backend::Sha256;

#[cfg(test)]
mod tests {
    use super::Sha256;

    #[test]
    fn hashes_known_vector() {
        let mut hasher = Sha256::new();
        hasher.update(b"");
        let hash = hasher.finalize();
        assert_eq!(
            hex::encode(hash),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b85"
        );
    }
}
