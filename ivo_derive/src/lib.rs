use proc_macro::TokenStream;
use quote::quote;
use syn::*;

// Derives Display for fieldless operator enums, printing the variant name
// in lower case (Add -> "add", SLT -> "slt").
#[proc_macro_derive(Mnemonic)]
pub fn mnemonic_derive(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);

	let Data::Enum(data) = &input.data else {
		panic!("Mnemonic can only be derived for enums");
	};

	let name = &input.ident;
	let arms = data.variants.iter().map(|variant| {
		let ident = &variant.ident;
		if !matches!(variant.fields, Fields::Unit) {
			panic!("Mnemonic variants must be fieldless");
		}
		let text = ident.to_string().to_lowercase();
		quote! { Self::#ident => #text, }
	});

	quote! {
		impl ::std::fmt::Display for #name {
			fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
				let name = match self {
					#(#arms)*
				};
				write!(f, "{}", name)
			}
		}
	}
	.into()
}
