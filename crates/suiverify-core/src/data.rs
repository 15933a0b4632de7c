//! Test fixtures for the core crate.
use crate::address::SuiAddress;
use crate::policy::PolicyObject;

pub(crate) const TEST_USER_ADDRESS: &str =
    "0xABC0000000000000000000000000000000000000000000000000000000000123";

pub(crate) const TEST_POLICY_OBJECT_ID: &str =
    "0x7a1c9c3c2f8a1d7c0e0c43a1f9b88d2c8e1c2b14a4f5c6d7e8f9a0b1c2d3e4f5";

pub(crate) const TEST_POLICY_CAP_ID: &str =
    "0x1f2e3d4c5b6a79880716253443526170f0e1d2c3b4a5968778695a4b3c2d1e0f";

pub(crate) fn test_policy() -> PolicyObject {
    PolicyObject::new(
        SuiAddress::parse(TEST_POLICY_OBJECT_ID).unwrap(),
        SuiAddress::parse(TEST_POLICY_CAP_ID).unwrap(),
    )
}

pub(crate) const TEST_EXECUTE_RESPONSE: &str = r#"{
    "digest": "8ZxE6k3v3xHW1FJ8b3yNQbLqfTnS3DdCwzAqkG6CwV9T",
    "effects": {
        "messageVersion": "v1",
        "status": { "status": "success" },
        "executedEpoch": "412",
        "gasUsed": {
            "computationCost": "1000000",
            "storageCost": "2280000",
            "storageRebate": "978120",
            "nonRefundableStorageFee": "9880"
        },
        "transactionDigest": "8ZxE6k3v3xHW1FJ8b3yNQbLqfTnS3DdCwzAqkG6CwV9T"
    },
    "objectChanges": [
        {
            "type": "mutated",
            "sender": "0xabc0000000000000000000000000000000000000000000000000000000000123",
            "objectType": "0x2::coin::Coin<0x2::sui::SUI>",
            "objectId": "0x5b4a3c2d1e0f9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b9c8d7e6f5a4b",
            "version": "101",
            "digest": "4Fq3m9rX2Vd8kWnZP1bC7tLsY6uHgJ5eRaN2xQwE3oTi"
        }
    ],
    "events": [],
    "confirmedLocalExecution": true
}"#;
