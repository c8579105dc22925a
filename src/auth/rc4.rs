//! RC4 stream cipher.
//!
//! RC4 is known-weak. It only keeps a shared secret from travelling in the
//! clear when TLS is not available; it is not a substitute for TLS.

use crate::error::{Result, RockerError};

/// RC4 keystream generator.
pub struct Rc4 {
    state: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4 {
    /// Run the key schedule. An empty key is rejected.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(RockerError::Config("RC4 key must not be empty".to_string()));
        }

        let mut state = [0u8; 256];
        for (i, slot) in state.iter_mut().enumerate() {
            *slot = i as u8;
        }

        let mut j: u8 = 0;
        for i in 0..256 {
            j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
            state.swap(i, j as usize);
        }

        Ok(Self { state, i: 0, j: 0 })
    }

    /// XOR `data` in place with the next bytes of the keystream.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            self.i = self.i.wrapping_add(1);
            self.j = self.j.wrapping_add(self.state[self.i as usize]);
            self.state.swap(self.i as usize, self.j as usize);
            let idx = self.state[self.i as usize].wrapping_add(self.state[self.j as usize]);
            *byte ^= self.state[idx as usize];
        }
    }
}

/// Encrypt or decrypt `data` with a fresh keystream for `key`.
pub fn apply(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut cipher = Rc4::new(key)?;
    let mut out = data.to_vec();
    cipher.apply_keystream(&mut out);
    Ok(out)
}
