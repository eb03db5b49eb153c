//! ABI surface of the deployed device registry contract.
//!
//! Only the functions and events this client touches are declared.

use alloy::sol;

sol! {
    #[sol(all_derives)]
    interface IDeviceRegistry {
        function registerDevice(string _did, string _metadata) external;

        function requestCrossDomainAuth(string _did, string _sourceDomain, string _targetDomain) external returns (bool);

        function devices(string) external view returns (
            string did,
            string metadata,
            uint8 status,
            address owner,
            uint256 registeredAt,
            uint256 lastUpdated,
            bool exists
        );

        event DeviceRegistered(string indexed did, address indexed owner, uint256 timestamp);

        event CrossDomainAuthRequested(string indexed did, string sourceDomain, string targetDomain);

        event CrossDomainAuthCompleted(string indexed did, string sourceDomain, string targetDomain, bool authorized);
    }
}
