// tests/verify_size.rs - End-to-end header verification against known blocks
// Tree location: ./tests/verify_size.rs

use cuckoo_pow::consensus::ChainType;
use cuckoo_pow::pow::{verify_size, BlockHeaderPow, Proof, ProofOfWork};
use cuckoo_pow::{CuckooPowError, VerifyError};

const USER_TESTING_NONCES: [u64; 42] = [
    749, 873, 927, 1637, 2687, 3668, 4346, 5192, 5787, 6055, 6270, 7064, 7140, 7474, 7805,
    9017, 9095, 9492, 10634, 11708, 11785, 11799, 12362, 12498, 12667, 13680, 13941, 15360,
    17955, 18519, 18691, 20589, 22113, 23605, 24538, 24871, 24945, 25137, 27372, 29195,
    31787, 32687,
];

const MAINNET_PRE_POW: [u8; 246] = [
    0, 1, 0, 0, 0, 0, 0, 0, 166, 143, 0, 0, 0, 0, 92, 97, 221, 123, 65, 75, 2, 126, 250,
    225, 45, 158, 210, 248, 55, 105, 130, 90, 94, 118, 135, 252, 69, 37, 52, 50, 194, 170,
    145, 153, 2, 30, 128, 217, 37, 221, 147, 20, 62, 61, 126, 215, 67, 191, 62, 42, 186, 32,
    5, 198, 186, 40, 161, 236, 126, 109, 184, 26, 161, 190, 73, 222, 239, 118, 83, 183, 71,
    73, 132, 11, 64, 125, 146, 139, 225, 244, 47, 141, 199, 90, 76, 56, 244, 136, 121, 185,
    23, 216, 41, 133, 1, 241, 186, 2, 77, 240, 57, 63, 126, 162, 125, 227, 34, 164, 26, 107,
    220, 53, 77, 101, 171, 75, 116, 63, 83, 159, 171, 197, 12, 45, 135, 48, 30, 114, 93,
    101, 112, 37, 24, 147, 140, 41, 119, 150, 116, 16, 37, 126, 102, 215, 165, 123, 55, 207,
    43, 81, 54, 220, 0, 255, 147, 139, 28, 4, 108, 212, 207, 194, 201, 226, 112, 192, 69,
    189, 145, 238, 225, 99, 88, 238, 153, 38, 147, 44, 113, 155, 215, 33, 80, 6, 55, 35,
    208, 211, 100, 18, 179, 165, 128, 210, 171, 164, 141, 246, 193, 166, 0, 0, 0, 0, 0, 2,
    245, 206, 0, 0, 0, 0, 0, 2, 7, 66, 0, 0, 0, 3, 199, 132, 143, 238, 0, 0, 0, 13, 16, 89,
    244, 58, 146, 89, 127, 83,
];

const MAINNET_NONCES: [u64; 42] = [
    18852094, 18878486, 39783881, 59379092, 62326621, 71455167, 131832576, 143026722,
    143954436, 155338092, 199111429, 207884782, 211343283, 226025553, 233881058, 237856564,
    244323712, 246236308, 253743368, 258760447, 259000289, 262474233, 268999312, 303276522,
    348709059, 371226190, 380435344, 381559211, 382415438, 385006790, 385328950, 389303551,
    424071479, 431735335, 462433478, 476234373, 512600249, 513776715, 514612369, 518186065,
    526136923, 533118850,
];

const MAINNET_PRE_POW_NO_NONCE: [u8; 238] = [
    0, 1, 0, 0, 0, 0, 0, 1, 136, 103, 0, 0, 0, 0, 92, 161, 240, 23, 11, 54, 6, 137, 119,
    213, 181, 62, 140, 201, 185, 216, 68, 65, 165, 93, 55, 90, 52, 98, 81, 27, 185, 236,
    201, 210, 4, 219, 92, 131, 246, 22, 117, 163, 209, 158, 107, 69, 158, 111, 33, 82, 240,
    128, 250, 114, 209, 178, 160, 128, 70, 201, 118, 164, 106, 137, 199, 18, 183, 251, 204,
    208, 238, 254, 214, 235, 67, 221, 26, 22, 175, 249, 124, 65, 195, 23, 20, 169, 140, 45,
    187, 140, 193, 71, 6, 74, 67, 57, 149, 241, 253, 76, 12, 213, 80, 53, 21, 206, 37, 226,
    255, 56, 91, 252, 249, 48, 224, 169, 190, 99, 246, 195, 217, 170, 3, 68, 109, 51, 103,
    161, 245, 241, 183, 172, 58, 59, 229, 193, 43, 189, 56, 176, 129, 173, 222, 37, 108, 81,
    185, 123, 249, 200, 223, 97, 63, 205, 72, 41, 212, 53, 155, 224, 4, 27, 150, 143, 18,
    45, 160, 27, 157, 128, 30, 242, 145, 74, 189, 175, 122, 40, 146, 87, 30, 120, 254, 146,
    229, 150, 37, 1, 142, 166, 185, 170, 27, 176, 25, 174, 122, 85, 159, 58, 0, 0, 0, 0, 0,
    4, 222, 130, 0, 0, 0, 0, 0, 3, 211, 103, 0, 0, 0, 3, 208, 114, 212, 188, 0, 0, 0, 13,
];

const MAINNET_POW_NONCE: u64 = 16079481998891884557;

const MAINNET_NONCES_NO_NONCE: [u64; 42] = [
    4950556, 10444042, 26994871, 63816933, 64006601, 70454862, 74408437, 101859857,
    103156578, 103619764, 110918645, 112676394, 156469828, 164995210, 177571941, 197003830,
    206258400, 232973126, 235492427, 243875402, 250871506, 261431148, 294643091, 315606197,
    320713204, 328097841, 331983190, 340029134, 341429798, 349593608, 352254617, 363452582,
    376534642, 385998553, 399426703, 399588750, 417560407, 418344217, 464144305, 478639713,
    500541067, 511159362,
];

/// Pre-PoW of the UserTesting block: version 1, a handful of set fields,
/// zeros elsewhere
fn user_testing_pre_pow() -> Vec<u8> {
    let mut pre_pow = vec![0u8; 246];
    pre_pow[1] = 1;
    pre_pow[233] = 3;
    pre_pow[237] = 1;
    pre_pow[244] = 109;
    pre_pow[245] = 239;
    pre_pow
}

fn header(height: u64, edge_bits: u8, nonce: u64, nonces: &[u64]) -> BlockHeaderPow {
    BlockHeaderPow {
        height,
        pow: ProofOfWork {
            nonce,
            proof: Proof::with_edge_bits(edge_bits, nonces.to_vec()),
            ..ProofOfWork::default()
        },
    }
}

#[test]
fn verify_user_testing_cuckatoo15() {
    let header = header(0, 15, 28143, &USER_TESTING_NONCES);
    verify_size(ChainType::UserTesting, &user_testing_pre_pow(), &header).unwrap();
}

#[test]
fn verify_mainnet_cuckaroo29() {
    let header = header(0, 29, 1178241309934714707, &MAINNET_NONCES);
    verify_size(ChainType::Mainnet, &MAINNET_PRE_POW, &header).unwrap();
}

#[test]
fn verify_mainnet_with_nonce_appended() {
    let mut pre_pow = MAINNET_PRE_POW_NO_NONCE.to_vec();
    pre_pow.extend_from_slice(&MAINNET_POW_NONCE.to_be_bytes());
    let header = header(0, 29, MAINNET_POW_NONCE, &MAINNET_NONCES_NO_NONCE);
    verify_size(ChainType::Mainnet, &pre_pow, &header).unwrap();
}

#[test]
fn missing_nonce_is_rejected() {
    let header = header(0, 29, MAINNET_POW_NONCE, &MAINNET_NONCES_NO_NONCE);
    assert!(verify_size(ChainType::Mainnet, &MAINNET_PRE_POW_NO_NONCE, &header).is_err());
}

#[test]
fn mainnet_proof_fails_after_first_fork() {
    // Same proof checked as Cuckarood
    let header = header(
        cuckoo_pow::consensus::HARD_FORK_INTERVAL,
        29,
        1178241309934714707,
        &MAINNET_NONCES,
    );
    assert!(matches!(
        verify_size(ChainType::Mainnet, &MAINNET_PRE_POW, &header),
        Err(CuckooPowError::Verify(_))
    ));
}

#[test]
fn tampered_header_is_rejected() {
    let mut pre_pow = MAINNET_PRE_POW.to_vec();
    pre_pow[10] ^= 1;
    let header = header(0, 29, 1178241309934714707, &MAINNET_NONCES);
    assert!(verify_size(ChainType::Mainnet, &pre_pow, &header).is_err());
}

#[test]
fn truncated_proof_is_wrong_length() {
    let header = header(0, 29, 1178241309934714707, &MAINNET_NONCES[..41]);
    assert!(matches!(
        verify_size(ChainType::Mainnet, &MAINNET_PRE_POW, &header),
        Err(CuckooPowError::Verify(VerifyError::WrongCycleLength))
    ));
}

#[test]
fn more_nonces_than_any_cycle_is_wrong_length() {
    let mut nonces = MAINNET_NONCES.to_vec();
    nonces.extend((1..=23).map(|n| (1 << 28) + n));
    assert_eq!(nonces.len(), 65);
    let header = header(0, 29, 1178241309934714707, &nonces);
    assert!(matches!(
        verify_size(ChainType::Mainnet, &MAINNET_PRE_POW, &header),
        Err(CuckooPowError::Verify(VerifyError::WrongCycleLength))
    ));
}
