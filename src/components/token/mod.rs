mod chain_name_link;
mod token;
mod token_address_link;
mod token_list;
mod token_list_element;
mod token_search_form;

pub use chain_name_link::ChainNameLink;
pub use token::Token;
pub use token_address_link::TokenAddressLink;
pub use token_list::TokenList;
pub use token_list_element::TokenListElement;
pub use token_search_form::TokenSearchForm;

#[cfg(test)]
pub(crate) fn sample_token(name: &str) -> crate::database::models::Token {
    let mut token = crate::database::models::Token::new(
        format!("0x{}", name.len()),
        crate::database::models::Chain::Ethereum,
        name.to_string(),
        name.to_uppercase(),
    );
    token.id = Some(name.to_lowercase());
    token
}
