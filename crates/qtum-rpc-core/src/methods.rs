//! Known node methods and the type tags of their positional parameters.

use std::collections::BTreeMap;

use crate::coerce::TypeTag;

/// Built-in methods as `(name, space-separated tags)`.
///
/// An empty tag string declares no tags, so every argument to that method is
/// sent unchanged. Nothing is stringified, not even the first argument.
const BUILTIN_METHODS: &[(&str, &str)] = &[
    ("abandonTransaction", "str"),
    ("addMultiSigAddress", ""),
    ("addNode", ""),
    ("backupWallet", ""),
    ("createMultiSig", ""),
    ("createRawTransaction", ""),
    ("decodeRawTransaction", ""),
    ("dumpPrivKey", ""),
    ("encryptWallet", ""),
    ("estimateFee", "int"),
    ("estimatePriority", "int"),
    ("generate", "int"),
    ("getAccount", ""),
    ("getAccountAddress", "str"),
    ("getAddedNodeInfo", ""),
    ("getAddressMempool", "obj"),
    ("getAddressUtxos", "obj"),
    ("getAddressBalance", "obj"),
    ("getAddressDeltas", "obj"),
    ("getAddressTxids", "obj"),
    ("getAddressesByAccount", ""),
    ("getBalance", "str int"),
    ("getBestBlockHash", ""),
    ("getBlockDeltas", "str"),
    ("getBlock", "str bool"),
    ("getBlockchainInfo", ""),
    ("getBlockCount", ""),
    ("getBlockHashes", "int int obj"),
    ("getBlockHash", "int"),
    ("getBlockHeader", "str"),
    ("getBlockNumber", ""),
    ("getBlockTemplate", ""),
    ("getConnectionCount", ""),
    ("getChainTips", ""),
    ("getDifficulty", ""),
    ("getGenerate", ""),
    ("getHashesPerSec", ""),
    ("getInfo", ""),
    ("getMemoryPool", ""),
    ("getMemPoolInfo", ""),
    ("getMiningInfo", ""),
    ("getNewAddress", ""),
    ("getPeerInfo", ""),
    ("getRawMemPool", ""),
    ("getRawTransaction", "str int"),
    ("getReceivedByAccount", "str int"),
    ("getReceivedByAddress", "str int"),
    ("getSpentInfo", "obj"),
    ("getTransaction", ""),
    ("getTxOut", "str int bool"),
    ("getTxOutSetInfo", ""),
    ("getWork", ""),
    ("help", ""),
    ("importAddress", "str str bool"),
    ("importPrivKey", "str str bool"),
    ("invalidateBlock", "str"),
    ("keyPoolRefill", ""),
    ("listAccounts", "int"),
    ("listAddressGroupings", ""),
    ("listReceivedByAccount", "int bool"),
    ("listReceivedByAddress", "int bool"),
    ("listSinceBlock", "str int"),
    ("listTransactions", "str int int"),
    ("listUnspent", "int int"),
    ("listLockUnspent", "bool"),
    ("lockUnspent", ""),
    ("move", "str str float int str"),
    ("prioritiseTransaction", "str float int"),
    ("sendFrom", "str str float int str str"),
    ("sendMany", "str obj int str"),
    ("sendRawTransaction", "str"),
    ("sendToAddress", "str float str str"),
    ("setAccount", ""),
    ("setGenerate", "bool int"),
    ("setTxFee", "float"),
    ("signMessage", ""),
    ("signRawTransaction", ""),
    ("stop", ""),
    ("submitBlock", ""),
    ("validateAddress", ""),
    ("verifyMessage", ""),
    ("walletLock", ""),
    ("walletPassPhrase", "string int"),
    ("walletPassphraseChange", ""),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    /// Lower-cased name sent on the wire.
    pub name: String,
    /// Per-position hints. Arguments beyond the declared tags are sent as given.
    pub tags: Vec<TypeTag>,
}

impl MethodSpec {
    fn parse(name: &str, tags: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            tags: tags.split_whitespace().map(TypeTag::from_token).collect(),
        }
    }

    pub fn tag(&self, position: usize) -> Option<TypeTag> {
        self.tags.get(position).copied()
    }
}

/// Case-insensitive lookup from method id to its [`MethodSpec`].
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    methods: BTreeMap<String, MethodSpec>,
}

impl MethodTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        BUILTIN_METHODS
            .iter()
            .fold(Self::empty(), |table, (name, tags)| table.with_method(name, tags))
    }

    /// Register `name` with space-separated `tags`, replacing any existing
    /// entry with the same case-insensitive name.
    pub fn with_method(mut self, name: &str, tags: &str) -> Self {
        let spec = MethodSpec::parse(name, tags);
        self.methods.insert(spec.name.clone(), spec);
        self
    }

    pub fn get(&self, method: &str) -> Option<&MethodSpec> {
        self.methods.get(&method.to_ascii_lowercase())
    }

    pub fn contains(&self, method: &str) -> bool {
        self.get(method).is_some()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Entries ordered by wire name.
    pub fn iter(&self) -> impl Iterator<Item = &MethodSpec> {
        self.methods.values()
    }
}
