//! The fixed abi of the ENSIP-10 resolver profile.

use alloy_sol_types::sol;

sol! {
    /// The resolver profile functions answered from a [`Record`](super::Record).
    #[derive(Debug, PartialEq, Eq)]
    interface IResolverProfiles {
        // https://eips.ethereum.org/EIPS/eip-181
        function name(bytes32 node) external view returns (string);
        // https://eips.ethereum.org/EIPS/eip-137
        function addr(bytes32 node) external view returns (address);
        // https://eips.ethereum.org/EIPS/eip-2304
        function addr(bytes32 node, uint256 coinType) external view returns (bytes);
        // https://eips.ethereum.org/EIPS/eip-634
        function text(bytes32 node, string key) external view returns (string);
        // https://docs.ens.domains/ensip/7
        function contenthash(bytes32 node) external view returns (bytes);
        // https://github.com/ethereum/EIPs/pull/619
        function pubkey(bytes32 node) external view returns (uint256 x, uint256 y);
        // https://docs.ens.domains/ensip/4
        function ABI(bytes32 node, uint256 contentTypes) external view returns (uint256, bytes);
        // https://github.com/ensdomains/ens-contracts/blob/staging/contracts/resolvers/IMulticallable.sol
        function multicall(bytes[] calls) external view returns (bytes[]);
    }

    /// The ENSIP-10 wildcard entry point.
    #[derive(Debug, PartialEq, Eq)]
    interface IExtendedResolver {
        function resolve(bytes name, bytes data) external view returns (bytes);
    }
}

/// The signature the `resolve()` handler is registered under.
pub(crate) const RESOLVE_SIGNATURE: &str = "resolve(bytes name, bytes data) returns (bytes)";
