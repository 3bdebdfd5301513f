use super::*;

#[test]
fn mix_seed_is_stable_and_index_sensitive() {
    assert_eq!(mix_seed(7, 3), mix_seed(7, 3));
    assert_ne!(mix_seed(7, 3), mix_seed(7, 4));
    assert_ne!(mix_seed(7, 3), mix_seed(8, 3));
}

#[test]
fn fnv_write_order_matters() {
    let mut a = Fnv1a64::new_default();
    a.write_u64(1);
    a.write_u64(2);
    let mut b = Fnv1a64::new_default();
    b.write_u64(2);
    b.write_u64(1);
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn lerp_hits_endpoints() {
    assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
    assert_eq!(lerp(2.0, 10.0, 0.5), 6.0);
}
