//! Protobuf wire types.
//!
//! Laid out the way `prost-build` emits them so the modules can be swapped
//! for generated code without touching callers.

pub mod google {
    pub mod protobuf {
        /// `Any` contains an arbitrary serialized protocol buffer message along
        /// with a URL that describes the type of the serialized message.
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Any {
            #[prost(string, tag = "1")]
            pub type_url: ::prost::alloc::string::String,
            #[prost(bytes = "vec", tag = "2")]
            pub value: ::prost::alloc::vec::Vec<u8>,
        }
    }
}

pub mod cosmos {
    pub mod base {
        pub mod v1beta1 {
            /// Coin defines a token with a denomination and an amount.
            ///
            /// The amount is a decimal string so that it can carry values wider
            /// than 64 bits.
            #[derive(Clone, PartialEq, Eq, ::prost::Message)]
            pub struct Coin {
                #[prost(string, tag = "1")]
                pub denom: ::prost::alloc::string::String,
                #[prost(string, tag = "2")]
                pub amount: ::prost::alloc::string::String,
            }
        }
    }

    pub mod crypto {
        pub mod secp256k1 {
            /// Compressed secp256k1 public key (33 bytes).
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct PubKey {
                #[prost(bytes = "vec", tag = "1")]
                pub key: ::prost::alloc::vec::Vec<u8>,
            }
        }
    }

    pub mod bank {
        pub mod v1beta1 {
            /// MsgSend represents a message to send coins from one account to another.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct MsgSend {
                #[prost(string, tag = "1")]
                pub from_address: ::prost::alloc::string::String,
                #[prost(string, tag = "2")]
                pub to_address: ::prost::alloc::string::String,
                #[prost(message, repeated, tag = "3")]
                pub amount: ::prost::alloc::vec::Vec<super::super::base::v1beta1::Coin>,
            }
        }
    }

    pub mod tx {
        pub mod signing {
            pub mod v1beta1 {
                /// SignMode represents a signing mode with its own security guarantees.
                #[derive(
                    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
                )]
                #[repr(i32)]
                pub enum SignMode {
                    /// Rejected by the signature verifier; only valid for simulation.
                    Unspecified = 0,
                    /// Signer signs over the protobuf `SignDoc` bytes.
                    Direct = 1,
                    /// Signer signs over the canonical amino JSON `StdSignDoc`.
                    LegacyAminoJson = 127,
                }
            }
        }

        pub mod v1beta1 {
            use crate::proto::cosmos::base::v1beta1::Coin;
            use crate::proto::google::protobuf::Any;

            /// TxBody is the body of a transaction that all signers sign over.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct TxBody {
                #[prost(message, repeated, tag = "1")]
                pub messages: ::prost::alloc::vec::Vec<Any>,
                #[prost(string, tag = "2")]
                pub memo: ::prost::alloc::string::String,
                /// Block height after which this transaction will not be
                /// processed by the chain; zero means no timeout.
                #[prost(uint64, tag = "3")]
                pub timeout_height: u64,
            }

            /// AuthInfo describes the fee and signer modes that are used to sign a
            /// transaction.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct AuthInfo {
                #[prost(message, repeated, tag = "1")]
                pub signer_infos: ::prost::alloc::vec::Vec<SignerInfo>,
                #[prost(message, optional, tag = "2")]
                pub fee: ::core::option::Option<Fee>,
            }

            /// SignerInfo describes the public key and signing mode of a single
            /// top-level signer.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct SignerInfo {
                #[prost(message, optional, tag = "1")]
                pub public_key: ::core::option::Option<Any>,
                #[prost(message, optional, tag = "2")]
                pub mode_info: ::core::option::Option<ModeInfo>,
                #[prost(uint64, tag = "3")]
                pub sequence: u64,
            }

            /// ModeInfo describes the signing mode of a single or nested multisig
            /// signer.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct ModeInfo {
                #[prost(oneof = "mode_info::Sum", tags = "1")]
                pub sum: ::core::option::Option<mode_info::Sum>,
            }

            pub mod mode_info {
                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct Single {
                    #[prost(
                        enumeration = "crate::proto::cosmos::tx::signing::v1beta1::SignMode",
                        tag = "1"
                    )]
                    pub mode: i32,
                }

                #[derive(Clone, PartialEq, ::prost::Oneof)]
                pub enum Sum {
                    #[prost(message, tag = "1")]
                    Single(Single),
                }
            }

            /// Fee includes the amount of coins paid in fees and the maximum
            /// gas to be used by the transaction.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct Fee {
                #[prost(message, repeated, tag = "1")]
                pub amount: ::prost::alloc::vec::Vec<Coin>,
                #[prost(uint64, tag = "2")]
                pub gas_limit: u64,
                #[prost(string, tag = "3")]
                pub payer: ::prost::alloc::string::String,
                #[prost(string, tag = "4")]
                pub granter: ::prost::alloc::string::String,
            }

            /// SignDoc is the type used for generating sign bytes for SIGN_MODE_DIRECT.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct SignDoc {
                #[prost(bytes = "vec", tag = "1")]
                pub body_bytes: ::prost::alloc::vec::Vec<u8>,
                #[prost(bytes = "vec", tag = "2")]
                pub auth_info_bytes: ::prost::alloc::vec::Vec<u8>,
                #[prost(string, tag = "3")]
                pub chain_id: ::prost::alloc::string::String,
                #[prost(uint64, tag = "4")]
                pub account_number: u64,
            }

            /// TxRaw is a variant of Tx that pins the signer's exact binary
            /// representation of body and auth_info. The hash of its
            /// serialization becomes the transaction hash.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct TxRaw {
                #[prost(bytes = "vec", tag = "1")]
                pub body_bytes: ::prost::alloc::vec::Vec<u8>,
                #[prost(bytes = "vec", tag = "2")]
                pub auth_info_bytes: ::prost::alloc::vec::Vec<u8>,
                #[prost(bytes = "vec", repeated, tag = "3")]
                pub signatures: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
            }
        }
    }
}

pub mod chainboard {
    pub mod identity {
        pub mod v1 {
            use crate::proto::cosmos::base::v1beta1::Coin;

            /// Registers a fresh identifier for a number of billing periods.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct MsgRegisterIdentifier {
                #[prost(string, tag = "1")]
                pub owner: ::prost::alloc::string::String,
                #[prost(string, tag = "2")]
                pub name: ::prost::alloc::string::String,
                #[prost(uint64, tag = "3")]
                pub periods: u64,
                #[prost(message, optional, tag = "4")]
                pub deposit: ::core::option::Option<Coin>,
            }

            /// Attaches an identifier (alias) to an owned name.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct MsgAddIdentifier {
                #[prost(string, tag = "1")]
                pub owner: ::prost::alloc::string::String,
                #[prost(string, tag = "2")]
                pub name: ::prost::alloc::string::String,
                #[prost(string, tag = "3")]
                pub identifier: ::prost::alloc::string::String,
                #[prost(string, tag = "4")]
                pub target: ::prost::alloc::string::String,
            }

            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct MsgRenewIdentifier {
                #[prost(string, tag = "1")]
                pub owner: ::prost::alloc::string::String,
                #[prost(string, tag = "2")]
                pub name: ::prost::alloc::string::String,
                #[prost(uint64, tag = "3")]
                pub periods: u64,
                #[prost(message, optional, tag = "4")]
                pub deposit: ::core::option::Option<Coin>,
            }
        }
    }

    pub mod registry {
        pub mod v1 {
            use crate::proto::cosmos::base::v1beta1::Coin;

            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct MsgCreateEntry {
                #[prost(string, tag = "1")]
                pub creator: ::prost::alloc::string::String,
                #[prost(string, tag = "2")]
                pub title: ::prost::alloc::string::String,
                #[prost(string, tag = "3")]
                pub metadata_uri: ::prost::alloc::string::String,
                #[prost(uint64, tag = "4")]
                pub max_supply: u64,
                #[prost(message, optional, tag = "5")]
                pub deposit: ::core::option::Option<Coin>,
            }

            /// Partial update of a registry entry. Unset fields keep their
            /// current on-chain value; a present zero sets the value to zero.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct MsgUpdateEntry {
                #[prost(string, tag = "1")]
                pub creator: ::prost::alloc::string::String,
                #[prost(uint64, tag = "2")]
                pub entry_id: u64,
                #[prost(string, optional, tag = "3")]
                pub title: ::core::option::Option<::prost::alloc::string::String>,
                #[prost(uint64, optional, tag = "4")]
                pub max_supply: ::core::option::Option<u64>,
                #[prost(uint64, optional, tag = "5")]
                pub royalty_bps: ::core::option::Option<u64>,
            }
        }
    }
}
