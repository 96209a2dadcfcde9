#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Integer lerp from `a` to `b` by `t` in 0..=255, same rounding as `mul_div255`.
pub(crate) fn lerp_u8(a: u8, b: u8, t: u16) -> u8 {
    let it = 255 - t;
    let v = u32::from(a) * u32::from(it) + u32::from(b) * u32::from(t);
    ((v + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_hash_is_incremental_and_stable() {
        let mut a = Fnv1a64::new_default();
        a.write_bytes(b"veneer");
        let mut b = Fnv1a64::new_default();
        b.write_u8(b'v');
        b.write_bytes(b"eneer");
        assert_eq!(a.finish(), b.finish());

        let mut c = Fnv1a64::new_default();
        c.write_bytes(b"veneer!");
        assert_ne!(a.finish(), c.finish());
    }

    #[test]
    fn mul_div255_variants_align() {
        for x in [0u16, 1, 127, 255] {
            for y in [0u16, 1, 127, 255] {
                assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
            }
        }
    }

    #[test]
    fn lerp_u8_endpoints_are_exact() {
        assert_eq!(lerp_u8(10, 240, 0), 10);
        assert_eq!(lerp_u8(10, 240, 255), 240);
        let mid = lerp_u8(0, 255, 128);
        assert!(mid > 120 && mid < 136);
    }
}
