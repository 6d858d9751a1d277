//! Open-ended string identifiers with well-known values.
//!
//! The service may add new values at any time, so these are newtypes over a
//! string rather than closed enums. Equality is by value.

use crate::codec::{Codec, CodecExt, STRING};
use std::borrow::Cow;
use std::fmt;

macro_rules! identifier {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$const_meta:meta])* $constant:ident => $id:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            $(
                $(#[$const_meta])*
                pub const $constant: $name = $name(Cow::Borrowed($id));
            )*

            /// Every value known at build time.
            pub const KNOWN: &'static [$name] = &[ $( $name::$constant, )* ];

            pub fn from_id(id: impl Into<String>) -> Self {
                let id = id.into();
                match Self::KNOWN.iter().find(|known| known.0 == id.as_str()) {
                    Some(known) => known.clone(),
                    None => $name(Cow::Owned(id)),
                }
            }

            pub fn id(&self) -> &str {
                &self.0
            }

            pub fn is_known(&self) -> bool {
                Self::KNOWN.contains(self)
            }

            pub fn codec() -> impl Codec<$name> {
                STRING.xmap(|id: String| $name::from_id(id), |value: &$name| value.id().to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name::from_id(id)
            }
        }
    };
}

identifier! {
    /// Kind of abuse reported against an address.
    AttackType {
        LOGIN_ATTEMPT => "login_attempt",
        REGISTRATION_ATTEMPT => "registration_attempt",
        COMMENT_SPAM => "comment_spam",
        DENIAL_OF_SERVICE => "denial_of_service",
        FORUM_SPAM => "forum_spam",
        FORM_SUBMISSION => "form_submission",
        PAYMENT_FRAUD => "payment_fraud",
        BOTNET_ZOMBIE => "botnet_zombie",
        PROBING => "probing",
        BRUTE_FORCE => "brute_force",
        SPOOFING => "spoofing",
        CVE_EXPLOIT => "cve_exploit",
    }
}

identifier! {
    /// Kind of service an anonymity operator sells.
    OperatorService {
        RESIDENTIAL_PROXIES => "residential_proxies",
        WIRELESS_PROXIES => "wireless_proxies",
        DATACENTER_PROXIES => "datacenter_proxies",
        DATACENTER_VPNS => "datacenter_vpns",
        RESIDENTIAL_VPNS => "residential_vpns",
        WEB_SCRAPING => "web_scraping",
    }
}

identifier! {
    /// Tunnel or proxy protocol offered by an operator.
    OperatorProtocol {
        OPENVPN => "OpenVPN",
        WIREGUARD => "Wireguard",
        ONION_ROUTING => "Onion Routing",
        IPSEC => "IPSec",
        SSH2 => "SSH2",
        PPTP => "PPTP",
        L2TP => "L2TP",
        SOCKS5 => "SOCKS5",
        IKEV2 => "IKEv2",
        HTTP => "HTTP",
        HTTPS => "HTTPS",
        SOCKS4 => "SOCKS4",
    }
}
